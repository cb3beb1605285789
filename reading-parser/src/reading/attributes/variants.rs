//! Variants
//!
//! One variant per format block of the sources column, or a single variant
//! built from the head's format when the sources column is absent. Series and
//! extra info from the head come first in every variant, followed by the
//! block's own. A block without a length takes the length column's.

use crate::reading::attributes::{head, shared};
use crate::reading::config::Config;
use crate::reading::error::{ParseError, ParseResult};
use crate::reading::item::{Format, Series, Source, Variant};
use crate::reading::length::{rational, Length};
use crate::reading::parsing::fields::{Fields, ParsedRow, SEGMENT};
use crate::reading::rows::columns::Column;

const ONE_ISBN: &str = "a variant allows only one ISBN/ASIN";

pub fn variants(row: &ParsedRow, index: usize, config: &Config) -> ParseResult<Vec<Variant>> {
    let empty = Fields::new();
    let head_block = row.head_blocks().get(index).unwrap_or(&empty);
    let head_format = head::format(row, index);
    let total_length = length_column(row)?;

    if row.is_compact() {
        let mut tokens = head_block.present("sources");
        if let Some(prefix) = row.head_prefix() {
            tokens.extend(prefix.present("sources"));
        }
        return Ok(vec![Variant {
            format: head_format,
            series: series(head_block),
            sources: sources(&tokens, head_block, &Column::CompactHead, config)?,
            extra_info: extra_info(head_block),
            ..Variant::default()
        }]);
    }

    let blocks = row.blocks(&Column::Sources);
    if blocks.is_empty() {
        return Ok(vec![Variant {
            format: head_format,
            series: series(head_block),
            length: total_length,
            extra_info: extra_info(head_block),
            ..Variant::default()
        }]);
    }

    blocks
        .iter()
        .map(|block| {
            let mut variant_series = series(head_block);
            variant_series.extend(series(block));
            let mut variant_extra = extra_info(head_block);
            variant_extra.extend(extra_info(block));
            Ok(Variant {
                format: block
                    .text("format")
                    .and_then(Format::from_name)
                    .or(head_format),
                series: variant_series,
                sources: sources(&block.present("sources"), block, &Column::Sources, config)?,
                isbn: block.text("isbn").map(str::to_string),
                length: shared::length(block).or(total_length),
                extra_info: variant_extra,
            })
        })
        .collect()
}

/// Series names and volumes, aligned by position.
fn series(fields: &Fields) -> Vec<Series> {
    let names = fields.list("series_names");
    let volumes = fields.list("series_volumes");
    (0..names.len().max(volumes.len()))
        .map(|i| Series {
            name: names.get(i).copied().flatten().map(str::to_string),
            volume: volumes
                .get(i)
                .copied()
                .flatten()
                .and_then(|volume| volume.parse().ok()),
        })
        .filter(|series| series.name.is_some() || series.volume.is_some())
        .collect()
}

fn extra_info(fields: &Fields) -> Vec<String> {
    fields
        .present("extra_info")
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Sources from name and URL tokens. A URL may be paired with a name using the
/// short separator; a lone URL is named after its domain when configured.
/// An ISBN left among the tokens means the block held more than one.
fn sources(
    tokens: &[&str],
    block: &Fields,
    column: &Column,
    config: &Config,
) -> ParseResult<Vec<Source>> {
    let grammar = config.grammar();
    tokens
        .iter()
        .map(|token| {
            if token.split_whitespace().any(|word| grammar.is_isbn(word)) {
                return Err(ParseError::parsing_with_reason(
                    column.name(),
                    block.text(SEGMENT).unwrap_or(*token),
                    ONE_ISBN,
                ));
            }

            let parts: Vec<&str> = grammar.short_separator.split(token).map(str::trim).collect();
            let Some(url) = parts.iter().copied().find(|part| grammar.is_url(part)) else {
                return Ok(Source {
                    name: Some(token.to_string()),
                    url: None,
                });
            };
            let name: Vec<&str> = parts
                .iter()
                .copied()
                .filter(|part| *part != url && !part.is_empty())
                .collect();
            let name = if name.is_empty() {
                config.name_for_url(url)
            } else {
                Some(name.join(&format!(" {} ", config.settings().short_separator)))
            };
            Ok(Source {
                name,
                url: Some(url.to_string()),
            })
        })
        .collect()
}

/// The length column's total: the length times `xN`. An episodic length
/// without a count has no known total.
pub fn length_column(row: &ParsedRow) -> ParseResult<Option<Length>> {
    let Some(fields) = row.first(&Column::Length) else {
        return Ok(None);
    };
    let Some(length) = shared::length(fields) else {
        return Ok(None);
    };
    match fields.text("repetitions") {
        Some(text) => {
            let count = shared::repetitions(text, Column::Length.name())?;
            let total = length.scale(rational(count)).ok_or_else(|| {
                ParseError::parsing_with_reason(
                    Column::Length.name(),
                    format!("x{}", text),
                    shared::AMOUNT_TOO_LARGE,
                )
            })?;
            Ok(Some(total))
        }
        None if fields.has("each") => Ok(None),
        None => Ok(Some(length)),
    }
}

/// Per-episode length, when the length column says `each`.
pub fn episodic_length(row: &ParsedRow) -> Option<Length> {
    let fields = row.first(&Column::Length)?;
    if fields.has("each") {
        shared::length(fields)
    } else {
        None
    }
}
