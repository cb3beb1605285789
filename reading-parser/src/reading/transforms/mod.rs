//! Transform pipeline infrastructure
//!
//! Rows go through a chain of stages, each a [`Runnable`] from one
//! intermediate shape to the next:
//!
//! ```text
//! String ─ Classify ─▶ ClassifiedRow ─ SplitColumns ─▶ SplitRow
//!        ─ ParseSegments ─▶ ParsedRow ─ BuildItems ─▶ Vec<Item>
//! ```
//!
//! [`Transform`] wraps a chain so it can be extended with `.then()`; the
//! compiler checks that each stage's input matches the previous output. Stages
//! hold the shared [`Config`](crate::reading::config::Config) behind an `Arc`,
//! so a built pipeline is `Send + Sync` and can be reused for every row.
//!
//! See [`standard`] for the pre-built pipelines.

pub mod stages;
pub mod standard;

use crate::reading::error::ParseResult;

/// Anything that can transform an input to an output
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> ParseResult<O>;
}

/// A composable transformation pipeline
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> ParseResult<O> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> ParseResult<O> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Chain a stage after this transform.
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    pub fn run(&self, input: I) -> ParseResult<O> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> ParseResult<O> {
        Transform::run(self, input)
    }
}
