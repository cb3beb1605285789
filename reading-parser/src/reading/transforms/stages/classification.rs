//! Classification stage: raw line to [`ClassifiedRow`]

use crate::reading::config::Config;
use crate::reading::error::ParseResult;
use crate::reading::rows::classification::{classify, RowKind};
use crate::reading::transforms::Runnable;
use std::sync::Arc;

/// A line together with its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    pub line: String,
    pub kind: RowKind,
}

pub struct Classify {
    config: Arc<Config>,
}

impl Classify {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl Runnable<String, ClassifiedRow> for Classify {
    fn run(&self, line: String) -> ParseResult<ClassifiedRow> {
        let kind = classify(&line, &self.config);
        Ok(ClassifiedRow { line, kind })
    }
}
