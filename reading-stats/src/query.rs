//! Query parsing
//!
//! `<operation> [count] [filter ...] [by <grouping>]`, whitespace separated.
//! Filters are `field<op>value`; in values an underscore stands for a space, so
//! `genre=historical_fiction` matches the genre "historical fiction".

use crate::error::QueryError;
use once_cell::sync::Lazy;
use reading_parser::reading::item::Format;
use regex::Regex;

/// Rankings list this many items unless the query says otherwise.
pub const DEFAULT_RANKING_SIZE: usize = 10;

static FILTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<field>[a-z]+)(?P<op>>=|<=|!=|=|>|<|~)(?P<value>.+)$")
        .unwrap_or_else(|e| unreachable!("filter pattern is valid: {}", e))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Count,
    AverageRating,
    AverageLength,
    TotalAmount,
    TopRating(usize),
    BottomRating(usize),
    TopLength(usize),
}

impl Operation {
    fn parse(name: &str, size: usize) -> Option<Self> {
        match name {
            "count" => Some(Operation::Count),
            "average-rating" => Some(Operation::AverageRating),
            "average-length" => Some(Operation::AverageLength),
            "total-amount" => Some(Operation::TotalAmount),
            "top-rating" => Some(Operation::TopRating(size)),
            "bottom-rating" => Some(Operation::BottomRating(size)),
            "top-length" => Some(Operation::TopLength(size)),
            _ => None,
        }
    }

    fn is_ranking(name: &str) -> bool {
        matches!(name, "top-rating" | "bottom-rating" | "top-length")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Contains,
}

impl Comparison {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "=" => Some(Comparison::Equal),
            "!=" => Some(Comparison::NotEqual),
            ">" => Some(Comparison::Greater),
            "<" => Some(Comparison::Less),
            ">=" => Some(Comparison::GreaterOrEqual),
            "<=" => Some(Comparison::LessOrEqual),
            "~" => Some(Comparison::Contains),
            _ => None,
        }
    }

    pub fn holds(self, actual: f64, expected: f64) -> bool {
        match self {
            Comparison::Equal => actual == expected,
            Comparison::NotEqual => actual != expected,
            Comparison::Greater => actual > expected,
            Comparison::Less => actual < expected,
            Comparison::GreaterOrEqual => actual >= expected,
            Comparison::LessOrEqual => actual <= expected,
            Comparison::Contains => false,
        }
    }

    fn is_equality(self) -> bool {
        matches!(self, Comparison::Equal | Comparison::NotEqual)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Done,
    InProgress,
    Planned,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Genre { negated: bool, genre: String },
    Format { negated: bool, format: Format },
    Author { comparison: Comparison, text: String },
    Title { comparison: Comparison, text: String },
    Rating { comparison: Comparison, rating: f64 },
    Status { negated: bool, status: Status },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Genre,
    Format,
    Rating,
    Year,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub operation: Operation,
    pub filters: Vec<Filter>,
    pub grouping: Option<Grouping>,
}

impl Query {
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        let mut tokens = text.split_whitespace().peekable();
        let name = tokens.next().ok_or(QueryError::Empty)?;

        let mut size = DEFAULT_RANKING_SIZE;
        if Operation::is_ranking(name) {
            if let Some(token) = tokens.next_if(|token| token.chars().all(|c| c.is_ascii_digit())) {
                size = token
                    .parse()
                    .map_err(|_| QueryError::InvalidArgument(token.to_string()))?;
            }
        }
        let operation = Operation::parse(name, size)
            .ok_or_else(|| QueryError::UnknownOperation(name.to_string()))?;

        let mut filters = Vec::new();
        let mut grouping = None;
        while let Some(token) = tokens.next() {
            if token == "by" {
                let name = tokens.next().ok_or(QueryError::MissingGrouping)?;
                grouping = Some(parse_grouping(name)?);
                if let Some(extra) = tokens.next() {
                    return Err(QueryError::TrailingToken(extra.to_string()));
                }
                break;
            }
            filters.push(parse_filter(token)?);
        }

        Ok(Query {
            operation,
            filters,
            grouping,
        })
    }
}

fn parse_grouping(name: &str) -> Result<Grouping, QueryError> {
    match name {
        "genre" => Ok(Grouping::Genre),
        "format" => Ok(Grouping::Format),
        "rating" => Ok(Grouping::Rating),
        "year" => Ok(Grouping::Year),
        other => Err(QueryError::UnknownGrouping(other.to_string())),
    }
}

fn parse_filter(token: &str) -> Result<Filter, QueryError> {
    let invalid = || QueryError::InvalidFilter(token.to_string());
    let captures = FILTER.captures(token).ok_or_else(invalid)?;
    let comparison = Comparison::parse(&captures["op"]).ok_or_else(invalid)?;
    let value = captures["value"].replace('_', " ");
    let negated = comparison == Comparison::NotEqual;

    match &captures["field"] {
        "genre" if comparison.is_equality() => Ok(Filter::Genre {
            negated,
            genre: value.to_lowercase(),
        }),
        "format" if comparison.is_equality() => Ok(Filter::Format {
            negated,
            format: Format::from_name(&value).ok_or_else(invalid)?,
        }),
        "author" if comparison.is_equality() || comparison == Comparison::Contains => {
            Ok(Filter::Author {
                comparison,
                text: value.to_lowercase(),
            })
        }
        "title" if comparison.is_equality() || comparison == Comparison::Contains => {
            Ok(Filter::Title {
                comparison,
                text: value.to_lowercase(),
            })
        }
        "rating" if comparison != Comparison::Contains => Ok(Filter::Rating {
            comparison,
            rating: value.parse().map_err(|_| invalid())?,
        }),
        "status" if comparison.is_equality() => {
            let status = match value.as_str() {
                "done" => Status::Done,
                "in progress" | "in-progress" => Status::InProgress,
                "planned" => Status::Planned,
                _ => return Err(invalid()),
            };
            Ok(Filter::Status { negated, status })
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_full_query() {
        let query = Query::parse("top-rating 3 genre=historical_fiction rating>=4 by year").unwrap();
        assert_eq!(query.operation, Operation::TopRating(3));
        assert_eq!(
            query.filters,
            vec![
                Filter::Genre {
                    negated: false,
                    genre: "historical fiction".to_string()
                },
                Filter::Rating {
                    comparison: Comparison::GreaterOrEqual,
                    rating: 4.0
                },
            ]
        );
        assert_eq!(query.grouping, Some(Grouping::Year));
    }

    #[test]
    fn test_ranking_size_defaults() {
        let query = Query::parse("top-length format=audiobook").unwrap();
        assert_eq!(query.operation, Operation::TopLength(DEFAULT_RANKING_SIZE));
    }

    #[rstest]
    #[case("", QueryError::Empty)]
    #[case("median", QueryError::UnknownOperation("median".to_string()))]
    #[case("count genre>5", QueryError::InvalidFilter("genre>5".to_string()))]
    #[case("count format=scroll", QueryError::InvalidFilter("format=scroll".to_string()))]
    #[case("count rating>=high", QueryError::InvalidFilter("rating>=high".to_string()))]
    #[case("count by", QueryError::MissingGrouping)]
    #[case("count by decade", QueryError::UnknownGrouping("decade".to_string()))]
    #[case("count by genre rating>3", QueryError::TrailingToken("rating>3".to_string()))]
    fn test_malformed_queries(#[case] text: &str, #[case] expected: QueryError) {
        assert_eq!(Query::parse(text).unwrap_err(), expected);
    }
}
