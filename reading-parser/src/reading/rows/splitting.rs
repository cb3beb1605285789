//! Column splitting
//!
//! Cuts a classified row into `(Column, text)` pairs. Regular rows are zipped
//! positionally against the enabled columns; compact planned rows have a single
//! compact head column.

use crate::reading::config::Config;
use crate::reading::error::{ParseError, ParseResult};
use crate::reading::rows::classification::{comment_body, RowKind};
use crate::reading::rows::columns::Column;

/// The non-blank columns of a row, in row order.
pub fn split_columns<'a>(
    line: &'a str,
    kind: RowKind,
    config: &Config,
) -> ParseResult<Vec<(Column, &'a str)>> {
    match kind {
        RowKind::CompactPlanned => {
            let body = comment_body(line, config).unwrap_or(line).trim();
            Ok(vec![(Column::CompactHead, body)])
        }
        RowKind::Regular => split_regular(line, config),
        _ => Ok(Vec::new()),
    }
}

fn split_regular<'a>(line: &'a str, config: &Config) -> ParseResult<Vec<(Column, &'a str)>> {
    let separator = config.settings().column_separator.as_str();
    let raw: Vec<&str> = line.split(separator).collect();
    let columns = config.columns();
    if raw.len() > columns.len() {
        return Err(ParseError::TooManyColumns {
            found: raw.len(),
            expected: columns.len(),
        });
    }

    Ok(columns
        .iter()
        .zip(raw)
        .map(|(column, text)| (column.clone(), text.trim()))
        .filter(|(_, text)| !text.is_empty())
        .collect())
}
