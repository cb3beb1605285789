//! Column definitions
//!
//! A [`Column`] names a logical slot of a row and describes how its text is cut
//! and matched: whether it splits at format markers, which separators cut it
//! into segment groups and segments, which candidate patterns apply to which
//! segment index, which fields are array-valued, and the per-field tweaks.

use crate::reading::parsing::fields::Value;
use crate::reading::parsing::grammar::{Candidate, Grammar};
use regex::Regex;
use std::fmt;

/// Fields that are coerced into arrays and concatenated when a column flattens.
const ARRAY_FIELDS: &[&str] = &["series_names", "series_volumes", "extra_info", "sources"];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Rating,
    Head,
    /// The head of a compact planned row, with `@sources` embedded.
    CompactHead,
    Sources,
    StartDates,
    EndDates,
    Genres,
    Length,
    Notes,
    History,
    CustomNumeric(String),
    CustomText(String),
}

impl Column {
    /// The standard columns, in their default order.
    pub const STANDARD: [Column; 9] = [
        Column::Rating,
        Column::Head,
        Column::Sources,
        Column::StartDates,
        Column::EndDates,
        Column::Genres,
        Column::Length,
        Column::Notes,
        Column::History,
    ];

    pub fn name(&self) -> &str {
        match self {
            Column::Rating => "rating",
            Column::Head | Column::CompactHead => "head",
            Column::Sources => "sources",
            Column::StartDates => "start_dates",
            Column::EndDates => "end_dates",
            Column::Genres => "genres",
            Column::Length => "length",
            Column::Notes => "notes",
            Column::History => "history",
            Column::CustomNumeric(name) | Column::CustomText(name) => name,
        }
    }

    pub fn from_standard_name(name: &str) -> Option<Column> {
        Column::STANDARD
            .into_iter()
            .find(|column| column.name() == name)
    }

    /// Whether format markers split this column into blocks.
    pub fn splits_by_format(&self) -> bool {
        matches!(self, Column::Head | Column::CompactHead | Column::Sources)
    }

    /// Whether the segments of each block merge into one set of fields.
    pub fn flattens(&self) -> bool {
        self.splits_by_format()
    }

    pub fn segment_separator<'g>(&self, grammar: &'g Grammar) -> Option<&'g Regex> {
        match self {
            Column::Head | Column::CompactHead | Column::Sources | Column::Notes => {
                Some(&grammar.long_separator)
            }
            Column::History => Some(&grammar.long_separator),
            Column::StartDates | Column::EndDates => Some(&grammar.list_separator),
            _ => None,
        }
    }

    pub fn group_separator<'g>(&self, grammar: &'g Grammar) -> Option<&'g Regex> {
        match self {
            Column::History => Some(&grammar.group_separator),
            _ => None,
        }
    }

    /// Patterns for text that precedes the first format marker. `None` means
    /// that text is parsed as an ordinary unformatted block.
    pub fn prefix_candidates<'g>(&self, grammar: &'g Grammar) -> Option<&'g [Candidate]> {
        match self {
            Column::Head => Some(&grammar.head_prefix),
            Column::CompactHead => Some(&grammar.compact_prefix),
            _ => None,
        }
    }

    /// Candidate patterns for the segment at `segment_index`, in priority order.
    pub fn candidates<'g>(&self, grammar: &'g Grammar, segment_index: usize) -> &'g [Candidate] {
        match (self, segment_index) {
            (Column::Rating, _) => &grammar.rating,
            (Column::Head, 0) => &grammar.head_first,
            (Column::Head, _) => &grammar.series_and_extra,
            (Column::CompactHead, 0) => &grammar.compact_head_first,
            (Column::CompactHead, _) => &grammar.compact_series_and_extra,
            (Column::Sources, 0) => &grammar.sources_first,
            (Column::Sources, _) => &grammar.series_and_extra,
            (Column::StartDates, _) => &grammar.start_dates,
            (Column::EndDates, _) => &grammar.end_dates,
            (Column::Genres, _) => &grammar.genres,
            (Column::Length, _) => &grammar.length,
            (Column::Notes, _) => &grammar.notes,
            (Column::History, _) => &grammar.history_entry,
            (Column::CustomNumeric(_), _) => &grammar.custom_numeric,
            (Column::CustomText(_), _) => &grammar.custom_text,
        }
    }

    pub fn is_array_field(&self, field: &str) -> bool {
        self.flattens() && ARRAY_FIELDS.contains(&field)
    }

    /// Post-capture transform of one field value.
    pub fn tweak(&self, field: &str, value: String, grammar: &Grammar) -> Value {
        let split = |separator: &Regex| {
            Value::List(
                separator
                    .split(&value)
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| Some(part.to_string()))
                    .collect(),
            )
        };
        match (self, field) {
            (Column::Sources, "sources") => split(&grammar.list_separator),
            (Column::CompactHead, "sources") => split(&grammar.at_separator),
            (_, "genres") | (Column::History, "except_dates") => split(&grammar.list_separator),
            _ => Value::Text(value),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::config::Config;

    #[test]
    fn test_standard_names_round_trip() {
        for column in Column::STANDARD {
            assert_eq!(Column::from_standard_name(column.name()), Some(column));
        }
        assert_eq!(Column::from_standard_name("mood"), None);
    }

    #[test]
    fn test_head_patterns_depend_on_segment_index() {
        let config = Config::default();
        let grammar = config.grammar();
        let first: Vec<_> = Column::Head
            .candidates(grammar, 0)
            .iter()
            .map(|c| c.name)
            .collect();
        let later: Vec<_> = Column::Head
            .candidates(grammar, 1)
            .iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(first, vec!["author_title"]);
        assert_eq!(later, vec!["series_volume", "series", "extra_info"]);
    }

    #[test]
    fn test_sources_tweak_splits_list() {
        let config = Config::default();
        let value = Column::Sources.tweak(
            "sources",
            "Lexpub, Hoopla".to_string(),
            config.grammar(),
        );
        assert_eq!(
            value,
            Value::List(vec![Some("Lexpub".to_string()), Some("Hoopla".to_string())])
        );
    }
}
