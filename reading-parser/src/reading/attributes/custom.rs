//! Values of configured custom columns, falling back to their defaults.

use crate::reading::config::Config;
use crate::reading::item::{CustomValue, Number};
use crate::reading::parsing::fields::ParsedRow;
use crate::reading::rows::columns::Column;
use std::collections::BTreeMap;

fn default_number(value: f64) -> Number {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Number::Integer(value as i64)
    } else {
        Number::Decimal(value)
    }
}

pub fn custom(row: &ParsedRow, config: &Config) -> BTreeMap<String, CustomValue> {
    let settings = config.settings();
    config
        .columns()
        .iter()
        .filter_map(|column| {
            let text = row
                .first(column)
                .and_then(|fields| fields.text("value"));
            let value = match column {
                Column::CustomNumeric(name) => text.and_then(Number::parse).or_else(|| {
                    settings
                        .custom_numeric_columns
                        .get(name)
                        .copied()
                        .map(default_number)
                })
                .map(CustomValue::Number),
                Column::CustomText(name) => text
                    .map(str::to_string)
                    .or_else(|| settings.custom_text_columns.get(name).cloned())
                    .map(CustomValue::Text),
                _ => return None,
            }?;
            Some((column.name().to_string(), value))
        })
        .collect()
}
