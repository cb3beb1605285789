//! Segment parsing stage: [`SplitRow`] to [`ParsedRow`]

use crate::reading::config::Config;
use crate::reading::error::ParseResult;
use crate::reading::parsing::fields::ParsedRow;
use crate::reading::parsing::segments::parse_row;
use crate::reading::transforms::stages::SplitRow;
use crate::reading::transforms::Runnable;
use std::sync::Arc;

pub struct ParseSegments {
    config: Arc<Config>,
}

impl ParseSegments {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl Runnable<SplitRow, ParsedRow> for ParseSegments {
    fn run(&self, row: SplitRow) -> ParseResult<ParsedRow> {
        let columns = row
            .columns
            .iter()
            .map(|(column, text)| (column.clone(), text.as_str()))
            .collect();
        parse_row(row.kind, columns, &self.config)
    }
}
