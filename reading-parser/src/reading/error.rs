//! Error types for parsing reading log rows
//!
//! Every error here means "this input is invalid". They are raised synchronously
//! by the row pipeline and carry the column and offending text so a caller-side
//! formatter can render them. [`LineError`] attaches the raw line and its number.

use thiserror::Error;

/// Reason used when a segment matched none of its column's candidate patterns.
pub const NO_MATCHING_FORMAT: &str = "matched none of the column's formats";

/// Errors raised while turning one row into items
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A segment matched none of its candidate grammars, or was otherwise malformed.
    #[error("could not parse \"{segment}\" in the {column} column: {reason}")]
    Parsing {
        column: String,
        segment: String,
        reason: String,
    },

    /// More raw columns than the active column configuration expects.
    #[error("too many columns: found {found}, expected at most {expected}")]
    TooManyColumns { found: usize, expected: usize },

    /// Blank or missing title, or no items in the head column.
    #[error("invalid head: {0}")]
    InvalidHead(String),

    /// A date ordering, overlap or backward-range violation.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A structural problem in the history column.
    #[error("invalid history: {0}")]
    InvalidHistory(String),
}

impl ParseError {
    pub fn parsing(column: impl Into<String>, segment: impl Into<String>) -> Self {
        ParseError::Parsing {
            column: column.into(),
            segment: segment.into(),
            reason: NO_MATCHING_FORMAT.to_string(),
        }
    }

    pub fn parsing_with_reason(
        column: impl Into<String>,
        segment: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ParseError::Parsing {
            column: column.into(),
            segment: segment.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Parsing { .. } => "parsing",
            ParseError::TooManyColumns { .. } => "too-many-columns",
            ParseError::InvalidHead(_) => "invalid-head",
            ParseError::InvalidDate(_) => "invalid-date",
            ParseError::InvalidHistory(_) => "invalid-history",
        }
    }
}

/// A [`ParseError`] together with the line that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line_number}: {error}\n  {line}")]
pub struct LineError {
    /// 1-based line number in the input.
    pub line_number: usize,
    pub line: String,
    #[source]
    pub error: ParseError,
}

/// Invalid settings handed to [`Config::new`](crate::reading::config::Config::new).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the head column must be enabled")]
    MissingHeadColumn,

    #[error("unknown column \"{0}\" (not a standard or custom column)")]
    UnknownColumn(String),

    #[error("column \"{0}\" is enabled more than once")]
    DuplicateColumn(String),

    #[error("setting \"{0}\" must not be empty")]
    EmptySetting(&'static str),

    #[error("pages_per_hour must be positive")]
    InvalidPagesPerHour,

    #[error("invalid pattern built from settings: {0}")]
    InvalidPattern(String),
}

impl From<regex::Error> for ConfigError {
    fn from(e: regex::Error) -> Self {
        ConfigError::InvalidPattern(e.to_string())
    }
}

/// Type alias for row-level results
pub type ParseResult<T> = Result<T, ParseError>;
