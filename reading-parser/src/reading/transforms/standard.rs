//! Standard transform definitions
//!
//! Pipelines over the default configuration are static (`once_cell::sync::Lazy`);
//! pipelines over a caller's configuration are built by the functions below.
//! Building items depends on today's date, so that pipeline is never static.

use crate::reading::config::Config;
use crate::reading::item::Item;
use crate::reading::parsing::fields::ParsedRow;
use crate::reading::transforms::stages::{
    BuildItems, ClassifiedRow, Classify, ParseSegments, SplitColumns,
};
use crate::reading::transforms::Transform;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Type alias for the full row transform
pub type ItemTransform = Transform<String, Vec<Item>>;

/// Type alias for the row-to-IR transform
pub type RowTransform = Transform<String, ParsedRow>;

/// The default configuration, compiled once.
pub static DEFAULT_CONFIG: Lazy<Arc<Config>> = Lazy::new(|| Arc::new(Config::default()));

/// Classification under the default configuration: String → ClassifiedRow
pub static CLASSIFICATION: Lazy<Transform<String, ClassifiedRow>> =
    Lazy::new(|| Transform::from_fn(Ok).then(Classify::new(DEFAULT_CONFIG.clone())));

/// Parsing under the default configuration: String → ParsedRow
pub static TO_PARSED_ROW: Lazy<RowTransform> = Lazy::new(|| to_parsed_row(DEFAULT_CONFIG.clone()));

/// String → ParsedRow: classify, split and parse segments.
pub fn to_parsed_row(config: Arc<Config>) -> RowTransform {
    Transform::from_fn(Ok)
        .then(Classify::new(config.clone()))
        .then(SplitColumns::new(config.clone()))
        .then(ParseSegments::new(config))
}

/// String → Vec<Item>: the whole row pipeline.
pub fn to_items(config: Arc<Config>, today: NaiveDate) -> ItemTransform {
    Transform::from_fn(Ok)
        .then(Classify::new(config.clone()))
        .then(SplitColumns::new(config.clone()))
        .then(ParseSegments::new(config.clone()))
        .then(BuildItems::new(config, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::rows::classification::RowKind;
    use crate::reading::rows::columns::Column;

    #[test]
    fn test_default_pipelines() {
        let classified = CLASSIFICATION.run("|Sapiens".to_string()).unwrap();
        assert_eq!(classified.kind, RowKind::Regular);

        let row = TO_PARSED_ROW.run("|Sapiens".to_string()).unwrap();
        assert!(row.has(&Column::Head));
    }

    #[test]
    fn test_item_pipeline() {
        let today = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let pipeline = to_items(DEFAULT_CONFIG.clone(), today);
        let items = pipeline.run("|📕Sapiens".to_string()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Sapiens");
    }
}
