//! Assembling
//!
//!     Turns one parsed row into its items. The head column may name several
//!     items; each one gets its own author, title, variants and experiences,
//!     while rating, genres, notes and custom columns are shared by all of them.
//!
//!     Every item is trimmed before it leaves: nested lists that hold only a
//!     blank element are emptied.

use crate::reading::attributes::{custom, experiences, genres, head, notes, rating, variants};
use crate::reading::config::Config;
use crate::reading::error::{ParseError, ParseResult};
use crate::reading::item::Item;
use crate::reading::parsing::fields::ParsedRow;
use chrono::NaiveDate;

/// All items of a row. Rows without items (blank, comment) yield none.
pub fn build_items(row: &ParsedRow, config: &Config, today: NaiveDate) -> ParseResult<Vec<Item>> {
    if !row.kind.has_items() {
        return Ok(Vec::new());
    }

    let count = head::item_count(row);
    if count == 0 {
        return Err(ParseError::InvalidHead("no item in the head column".to_string()));
    }

    (0..count)
        .map(|index| build_item(row, index, config, today))
        .collect()
}

fn build_item(row: &ParsedRow, index: usize, config: &Config, today: NaiveDate) -> ParseResult<Item> {
    let variants = variants::variants(row, index, config)?;
    let experiences = experiences::experiences(row, index, &variants, config, today)?;

    Ok(Item {
        rating: rating::rating(row),
        author: head::author(row, index),
        title: head::title(row, index)?,
        genres: genres::genres(row),
        variants,
        experiences,
        notes: notes::notes(row),
        custom: custom::custom(row, config),
    }
    .trimmed())
}
