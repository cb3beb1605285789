//! Row Classification
//!
//! Decides what a raw line is before anything is split or matched. Pure and
//! infallible: malformed content is left for the later stages to reject.

use crate::reading::config::Config;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Blank,
    Comment,
    /// A comment-marked line listing planned items under a genre label.
    CompactPlanned,
    Regular,
    /// A comment-marked `config:` line. Recognized, never applied.
    CustomConfigDirective,
}

impl RowKind {
    /// Whether rows of this kind produce items.
    pub fn has_items(&self) -> bool {
        matches!(self, RowKind::Regular | RowKind::CompactPlanned)
    }
}

/// Text of a comment-marked line after the comment character.
pub fn comment_body<'a>(line: &'a str, config: &Config) -> Option<&'a str> {
    line.trim_start()
        .strip_prefix(config.settings().comment_character.as_str())
}

pub fn classify(line: &str, config: &Config) -> RowKind {
    if line.trim().is_empty() {
        return RowKind::Blank;
    }

    let Some(body) = comment_body(line, config) else {
        return RowKind::Regular;
    };

    let grammar = config.grammar();
    if grammar.config_directive.is_match(body) {
        return RowKind::CustomConfigDirective;
    }

    // A commented-out regular row is still just a comment.
    if body.contains(config.settings().column_separator.as_str()) {
        return RowKind::Comment;
    }

    match grammar.format_marker.find(body) {
        Some(marker) if grammar.compact_header.is_match(&body[..marker.start()]) => {
            RowKind::CompactPlanned
        }
        _ => RowKind::Comment,
    }
}
