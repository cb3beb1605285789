//! Author, title, format and head progress of the item at `index`.

use crate::reading::attributes::shared;
use crate::reading::error::{ParseError, ParseResult};
use crate::reading::item::Format;
use crate::reading::length::Progress;
use crate::reading::parsing::fields::{Fields, ParsedRow};

fn block(row: &ParsedRow, index: usize) -> Option<&Fields> {
    row.head_blocks().get(index)
}

/// Number of items named by the head column.
pub fn item_count(row: &ParsedRow) -> usize {
    row.head_blocks().len()
}

pub fn author(row: &ParsedRow, index: usize) -> Option<String> {
    block(row, index)?.text("author").map(str::to_string)
}

pub fn title(row: &ParsedRow, index: usize) -> ParseResult<String> {
    block(row, index)
        .and_then(|fields| fields.text("title"))
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ParseError::InvalidHead(format!("item {} has a blank title", index + 1)))
}

pub fn format(row: &ParsedRow, index: usize) -> Option<Format> {
    block(row, index)?.text("format").and_then(Format::from_name)
}

/// Progress written in the item's own block, else before the first format.
pub fn progress(row: &ParsedRow, index: usize) -> Option<Progress> {
    block(row, index)
        .and_then(shared::progress)
        .or_else(|| row.head_prefix().and_then(shared::progress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::config::Config;
    use crate::reading::parsing::segments::parse_column;
    use crate::reading::rows::classification::RowKind;
    use crate::reading::rows::columns::Column;

    fn row(head: &str) -> ParsedRow {
        let mut row = ParsedRow::new(RowKind::Regular);
        let parsed = parse_column(&Column::Head, head, &Config::default()).unwrap();
        row.columns.insert(Column::Head, parsed);
        row
    }

    #[test]
    fn test_blank_title_is_invalid_head() {
        let row = row("📕 ");
        assert_eq!(item_count(&row), 1);
        assert!(matches!(title(&row, 0), Err(ParseError::InvalidHead(_))));
    }

    #[test]
    fn test_prefix_progress_applies_to_every_item() {
        let row = row("DNF 📕Goatsong, 🔊40% Sapiens");
        assert_eq!(progress(&row, 0), Some(Progress::Fraction(0.0)));
        assert_eq!(progress(&row, 1), Some(Progress::Fraction(0.4)));
        assert_eq!(format(&row, 1), Some(Format::Audiobook));
        assert_eq!(author(&row, 0), None);
    }
}
