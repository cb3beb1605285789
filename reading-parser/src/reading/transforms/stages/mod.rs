//! Individual transformation stages
//!
//! Each stage implements [`Runnable`](crate::reading::transforms::Runnable) and
//! carries the shared configuration it needs.

pub mod assembling;
pub mod classification;
pub mod segments;
pub mod splitting;

pub use assembling::BuildItems;
pub use classification::{Classify, ClassifiedRow};
pub use segments::ParseSegments;
pub use splitting::{SplitColumns, SplitRow};
