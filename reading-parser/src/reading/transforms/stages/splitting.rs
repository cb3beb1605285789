//! Splitting stage: [`ClassifiedRow`] to [`SplitRow`]

use crate::reading::config::Config;
use crate::reading::error::ParseResult;
use crate::reading::rows::classification::RowKind;
use crate::reading::rows::columns::Column;
use crate::reading::rows::splitting::split_columns;
use crate::reading::transforms::stages::ClassifiedRow;
use crate::reading::transforms::Runnable;
use std::sync::Arc;

/// The non-blank columns of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRow {
    pub kind: RowKind,
    pub columns: Vec<(Column, String)>,
}

pub struct SplitColumns {
    config: Arc<Config>,
}

impl SplitColumns {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl Runnable<ClassifiedRow, SplitRow> for SplitColumns {
    fn run(&self, row: ClassifiedRow) -> ParseResult<SplitRow> {
        let columns = split_columns(&row.line, row.kind, &self.config)?
            .into_iter()
            .map(|(column, text)| (column, text.to_string()))
            .collect();
        Ok(SplitRow {
            kind: row.kind,
            columns,
        })
    }
}
