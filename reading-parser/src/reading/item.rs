//! Item records
//!
//! The output of the row pipeline: one [`Item`] per title on a row, with its
//! variants, experiences and notes. Records are built bottom-up
//! (`Span` → `Experience` → `Item`) and are not mutated after assembly.
//!
//! The `Default` value of each record is the item template: it supplies the
//! defaults for attributes a row leaves blank, and it is the "blank" sentinel
//! used by [`Item::trimmed`].

use crate::reading::length::{Length, Progress};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Format of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Print,
    Ebook,
    Audiobook,
    Pdf,
    Audio,
    Website,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::Print,
        Format::Ebook,
        Format::Audiobook,
        Format::Pdf,
        Format::Audio,
        Format::Website,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Format::Print => "print",
            Format::Ebook => "ebook",
            Format::Audiobook => "audiobook",
            Format::Pdf => "pdf",
            Format::Audio => "audio",
            Format::Website => "website",
        }
    }

    pub fn from_name(name: &str) -> Option<Format> {
        Format::ALL.into_iter().find(|format| format.name() == name)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A number that stays an integer when written as one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Number {
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if let Ok(integer) = text.parse::<i64>() {
            return Some(Number::Integer(integer));
        }
        text.parse::<f64>().ok().map(Number::Decimal)
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(integer) => *integer as f64,
            Number::Decimal(decimal) => *decimal,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(integer) => write!(f, "{}", integer),
            Number::Decimal(decimal) => write!(f, "{}", decimal),
        }
    }
}

/// Value of a configured custom column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CustomValue {
    Number(Number),
    Text(String),
}

/// A date range; either bound may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub begin: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(begin: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { begin, end }
    }

    pub fn closed(begin: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(begin), Some(end))
    }

    /// Number of days covered, when both bounds are known.
    pub fn days(&self) -> Option<i64> {
        match (self.begin, self.end) {
            (Some(begin), Some(end)) => Some((end - begin).num_days() + 1),
            _ => None,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = |date: Option<NaiveDate>| {
            date.map(|d| d.format("%Y/%m/%d").to_string())
                .unwrap_or_default()
        };
        write!(f, "{}..{}", format(self.begin), format(self.end))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Series {
    pub name: Option<String>,
    pub volume: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Source {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// One acquirable form of an item
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Variant {
    pub format: Option<Format>,
    pub series: Vec<Series>,
    pub sources: Vec<Source>,
    pub isbn: Option<String>,
    pub length: Option<Length>,
    pub extra_info: Vec<String>,
}

/// One contiguous reading interval
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Span {
    /// `None` for a planned, undated span
    pub dates: Option<DateRange>,
    pub amount: Option<Length>,
    pub progress: Option<Progress>,
    pub name: Option<String>,
    pub favorite: bool,
}

/// One reading occasion of one variant
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Experience {
    pub spans: Vec<Span>,
    pub group: Option<String>,
    pub variant_index: usize,
}

impl Experience {
    pub fn first_begin(&self) -> Option<NaiveDate> {
        self.spans
            .iter()
            .find_map(|span| span.dates.as_ref().and_then(|dates| dates.begin))
    }

    /// End of the last dated span. The outer `None` means no dated span; the
    /// inner `None` means that span is still open.
    pub fn last_end(&self) -> Option<Option<NaiveDate>> {
        self.spans
            .iter()
            .rev()
            .find_map(|span| span.dates.as_ref().map(|dates| dates.end))
    }

    pub fn last_progress(&self) -> Option<Progress> {
        self.spans.last().and_then(|span| span.progress)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Note {
    pub blurb: bool,
    pub private: bool,
    pub content: String,
}

/// One parsed item
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Item {
    pub rating: Option<Number>,
    pub author: Option<String>,
    pub title: String,
    pub genres: Vec<String>,
    pub variants: Vec<Variant>,
    pub experiences: Vec<Experience>,
    pub notes: Vec<Note>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, CustomValue>,
}

/// Empties a list whose only element equals the template's default element.
fn trim_list<T: PartialEq + Default>(list: &mut Vec<T>) {
    if list.len() == 1 && list[0] == T::default() {
        list.clear();
    }
}

impl Item {
    /// Collapses nested lists that hold only a blank template element, innermost
    /// first, so `series: [{name: None, volume: None}]` becomes `series: []`.
    pub fn trimmed(mut self) -> Self {
        for variant in &mut self.variants {
            trim_list(&mut variant.series);
            trim_list(&mut variant.sources);
            trim_list(&mut variant.extra_info);
        }
        trim_list(&mut self.variants);
        for experience in &mut self.experiences {
            trim_list(&mut experience.spans);
        }
        trim_list(&mut self.experiences);
        trim_list(&mut self.notes);
        trim_list(&mut self.genres);
        self
    }

    pub fn format(&self) -> Option<Format> {
        self.variants.first().and_then(|variant| variant.format)
    }

    /// Length of the first variant that has one.
    pub fn length(&self) -> Option<Length> {
        self.variants.iter().find_map(|variant| variant.length)
    }

    /// Serialize to a JSON value (plain nested maps and lists).
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
