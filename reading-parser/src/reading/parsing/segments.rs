//! Segment parser
//!
//! Turns one column's text into a [`ParsedColumn`]:
//!
//! 1. Columns that split by format (head, sources) are cut at format markers.
//!    Text before the first marker is parsed as a prefix.
//! 2. Each block is cut into segments (and, for history, segment groups).
//! 3. Each segment is matched against the column's ordered candidates; the first
//!    match wins and no match is a parsing error.
//! 4. Captures are stripped, blank captures dropped, and tweaks applied.
//! 5. Array-valued fields are coerced into lists so blanks keep their position.
//! 6. Flattening columns merge a block's segments into one set of fields.

use crate::reading::config::Config;
use crate::reading::error::{ParseError, ParseResult};
use crate::reading::parsing::fields::{Fields, ParsedColumn, ParsedRow, Value, SEGMENT};
use crate::reading::parsing::grammar::Candidate;
use crate::reading::rows::classification::RowKind;
use crate::reading::rows::columns::Column;
use tracing::trace;

/// Parse every column of a split row.
pub fn parse_row(
    kind: RowKind,
    columns: Vec<(Column, &str)>,
    config: &Config,
) -> ParseResult<ParsedRow> {
    let mut row = ParsedRow::new(kind);
    for (column, text) in columns {
        let parsed = parse_column(&column, text, config)?;
        row.columns.insert(column, parsed);
    }
    Ok(row)
}

pub fn parse_column(column: &Column, text: &str, config: &Config) -> ParseResult<ParsedColumn> {
    let grammar = config.grammar();

    if column.splits_by_format() {
        return parse_blocks(column, text, config);
    }

    if let Some(group_separator) = column.group_separator(grammar) {
        let groups = group_separator
            .split(text)
            .filter(|group| !group.trim().is_empty())
            .map(|group| parse_segments(column, group, config))
            .collect::<ParseResult<Vec<_>>>()?;
        return Ok(ParsedColumn::Groups(groups));
    }

    Ok(ParsedColumn::Segments(parse_segments(column, text, config)?))
}

fn parse_blocks(column: &Column, text: &str, config: &Config) -> ParseResult<ParsedColumn> {
    let grammar = config.grammar();
    let markers: Vec<_> = grammar.format_marker.find_iter(text).collect();

    let Some(first) = markers.first() else {
        return Ok(ParsedColumn::Blocks {
            prefix: None,
            blocks: vec![flatten_block(column, text.trim(), config)?],
        });
    };

    let mut prefix = None;
    let mut blocks = Vec::new();

    let before = text[..first.start()].trim();
    if !before.is_empty() {
        match column.prefix_candidates(grammar) {
            Some(candidates) => prefix = Some(match_segment(column, candidates, before, config)?),
            None => blocks.push(flatten_block(column, before, config)?),
        }
    }

    for (index, marker) in markers.iter().enumerate() {
        let end = markers
            .get(index + 1)
            .map_or(text.len(), |next| next.start());
        let body = strip_trailing_list_separator(&text[marker.end()..end], config);
        let mut fields = flatten_block(column, body, config)?;
        let symbol = marker.as_str().trim_end_matches('\u{FE0F}');
        if let Some(format) = config.format_for_symbol(symbol) {
            fields.insert("format", Value::Text(format.name().to_string()));
        }
        blocks.push(fields);
    }

    Ok(ParsedColumn::Blocks { prefix, blocks })
}

fn strip_trailing_list_separator<'a>(block: &'a str, config: &Config) -> &'a str {
    let block = block.trim();
    block
        .strip_suffix(config.settings().list_separator.as_str())
        .map_or(block, str::trim_end)
}

/// Parse a block's segments and merge them into one set of fields. The block's
/// text is kept under [`SEGMENT`] for errors raised after parsing.
fn flatten_block(column: &Column, text: &str, config: &Config) -> ParseResult<Fields> {
    let mut merged = Fields::new();
    for fields in parse_segments(column, text, config)? {
        merged.merge(fields);
    }
    merged.insert(SEGMENT, Value::Text(text.to_string()));
    Ok(merged)
}

fn parse_segments(column: &Column, text: &str, config: &Config) -> ParseResult<Vec<Fields>> {
    let grammar = config.grammar();
    let segments: Vec<&str> = match column.segment_separator(grammar) {
        Some(separator) => separator.split(text.trim()).collect(),
        None => vec![text],
    };

    segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| (index, segment.trim()))
        .filter(|(_, segment)| !segment.is_empty())
        .map(|(index, segment)| {
            match_segment(column, column.candidates(grammar, index), segment, config)
        })
        .collect()
}

/// First matching candidate wins.
fn match_segment(
    column: &Column,
    candidates: &[Candidate],
    segment: &str,
    config: &Config,
) -> ParseResult<Fields> {
    let grammar = config.grammar();
    for candidate in candidates {
        let Some(captures) = candidate.regex.captures(segment) else {
            continue;
        };
        trace!(column = %column, candidate = candidate.name, segment, "matched segment");

        let mut fields = Fields::new();
        for name in candidate.regex.capture_names().flatten() {
            let value = captures
                .name(name)
                .map(|capture| capture.as_str().trim())
                .filter(|text| !text.is_empty())
                .map(|text| column.tweak(name, text.to_string(), grammar));

            if column.is_array_field(name) {
                let list = value.map_or(Value::List(vec![None]), Value::into_list);
                fields.insert(name, list);
            } else if let Some(value) = value {
                fields.insert(name, value);
            }
        }
        return Ok(fields);
    }

    Err(ParseError::parsing(column.name(), segment))
}
