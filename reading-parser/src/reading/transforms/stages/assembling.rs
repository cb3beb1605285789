//! Assembling stage: [`ParsedRow`] to items

use crate::reading::assembling::build_items;
use crate::reading::config::Config;
use crate::reading::error::ParseResult;
use crate::reading::item::Item;
use crate::reading::parsing::fields::ParsedRow;
use crate::reading::transforms::Runnable;
use chrono::NaiveDate;
use std::sync::Arc;

/// Builds items, dating open ranges and open ends against `today`.
pub struct BuildItems {
    config: Arc<Config>,
    today: NaiveDate,
}

impl BuildItems {
    pub fn new(config: Arc<Config>, today: NaiveDate) -> Self {
        Self { config, today }
    }
}

impl Runnable<ParsedRow, Vec<Item>> for BuildItems {
    fn run(&self, row: ParsedRow) -> ParseResult<Vec<Item>> {
        build_items(&row, &self.config, self.today)
    }
}
