//! Query errors

use thiserror::Error;

/// A statistics query that cannot be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("empty query")]
    Empty,

    #[error("unknown operation \"{0}\"")]
    UnknownOperation(String),

    #[error("\"{0}\" is not a valid count")]
    InvalidArgument(String),

    #[error("invalid filter \"{0}\"")]
    InvalidFilter(String),

    #[error("unknown grouping \"{0}\" (expected genre, format, rating or year)")]
    UnknownGrouping(String),

    #[error("\"by\" must be followed by a grouping")]
    MissingGrouping,

    #[error("unexpected \"{0}\" after the grouping")]
    TrailingToken(String),
}
