use crate::reading::item::Number;
use crate::reading::parsing::fields::ParsedRow;
use crate::reading::rows::columns::Column;

/// Integer when written as one, decimal otherwise.
pub fn rating(row: &ParsedRow) -> Option<Number> {
    row.first(&Column::Rating)?
        .text("rating")
        .and_then(Number::parse)
}
