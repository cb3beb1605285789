//! Query evaluation
//!
//! Items are filtered, optionally grouped, and each group is reduced by the
//! query's operation. Lengths and amounts are compared in pages, converting
//! times with the configured reading speed.

use crate::query::{Comparison, Filter, Grouping, Operation, Query, Status};
use reading_parser::reading::item::{Format, Item};
use reading_parser::reading::length::{Length, Progress};
use serde::Serialize;
use std::collections::BTreeMap;

/// Group key for items without a value for the grouping.
pub const UNGROUPED: &str = "none";

/// One entry of a ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub title: String,
    pub value: f64,
}

/// Result of an operation over one set of items
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Count(usize),
    /// `None` when no item had a value to reduce.
    Number(Option<f64>),
    Ranking(Vec<Ranked>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatsOutput {
    Single(Value),
    Grouped(BTreeMap<String, Value>),
}

pub fn evaluate(query: &Query, items: &[Item], pages_per_hour: u32) -> StatsOutput {
    let selected: Vec<&Item> = items
        .iter()
        .filter(|item| query.filters.iter().all(|filter| matches(filter, item)))
        .collect();

    match query.grouping {
        None => StatsOutput::Single(reduce(query.operation, &selected, pages_per_hour)),
        Some(grouping) => {
            let mut groups: BTreeMap<String, Vec<&Item>> = BTreeMap::new();
            for item in selected {
                for key in group_keys(grouping, item) {
                    groups.entry(key).or_default().push(item);
                }
            }
            StatsOutput::Grouped(
                groups
                    .into_iter()
                    .map(|(key, items)| (key, reduce(query.operation, &items, pages_per_hour)))
                    .collect(),
            )
        }
    }
}

/// Where an item stands, judged by its last experience.
pub fn status(item: &Item) -> Option<Status> {
    let Some(experience) = item.experiences.last() else {
        return Some(Status::Planned);
    };
    match experience.last_end() {
        None => Some(Status::Planned),
        Some(None) => Some(Status::InProgress),
        Some(Some(_)) => match experience.last_progress() {
            None => Some(Status::Done),
            Some(progress) if progress.is_complete() => Some(Status::Done),
            // Did not finish
            Some(_) => None,
        },
    }
}

fn matches(filter: &Filter, item: &Item) -> bool {
    match filter {
        Filter::Genre { negated, genre } => {
            let found = item.genres.iter().any(|g| g.to_lowercase() == *genre);
            found != *negated
        }
        Filter::Format { negated, format } => {
            let found = item.variants.iter().any(|v| v.format == Some(*format));
            found != *negated
        }
        Filter::Author { comparison, text } => item
            .author
            .as_deref()
            .is_some_and(|author| text_matches(*comparison, author, text)),
        Filter::Title { comparison, text } => text_matches(*comparison, &item.title, text),
        Filter::Rating { comparison, rating } => item
            .rating
            .is_some_and(|actual| comparison.holds(actual.as_f64(), *rating)),
        Filter::Status { negated, status: expected } => (status(item) == Some(*expected)) != *negated,
    }
}

fn text_matches(comparison: Comparison, actual: &str, expected: &str) -> bool {
    let actual = actual.to_lowercase();
    match comparison {
        Comparison::Contains => actual.contains(expected),
        Comparison::NotEqual => actual != expected,
        _ => actual == expected,
    }
}

fn group_keys(grouping: Grouping, item: &Item) -> Vec<String> {
    let keys: Vec<String> = match grouping {
        Grouping::Genre => item.genres.clone(),
        Grouping::Format => {
            let mut formats: Vec<Format> = item.variants.iter().filter_map(|v| v.format).collect();
            formats.sort();
            formats.dedup();
            formats.iter().map(|format| format.name().to_string()).collect()
        }
        Grouping::Rating => item.rating.iter().map(|rating| rating.to_string()).collect(),
        Grouping::Year => item
            .experiences
            .iter()
            .rev()
            .find_map(|experience| experience.last_end().flatten())
            .map(|end| end.format("%Y").to_string())
            .into_iter()
            .collect(),
    };
    if keys.is_empty() {
        vec![UNGROUPED.to_string()]
    } else {
        keys
    }
}

/// `None` when the conversion overflows.
fn pages(length: Length, pages_per_hour: u32) -> Option<f64> {
    let pages = length.to_pages(pages_per_hour)?;
    Some(*pages.numer() as f64 / *pages.denom() as f64)
}

/// Pages read in an item: every span's amount, or for spans with only a
/// progress amount, that amount.
fn amount_read(item: &Item, pages_per_hour: u32) -> f64 {
    item.experiences
        .iter()
        .flat_map(|experience| &experience.spans)
        .map(|span| match (span.amount, span.progress) {
            (Some(amount), _) => pages(amount, pages_per_hour).unwrap_or(0.0),
            (None, Some(Progress::Amount(amount))) => pages(amount, pages_per_hour).unwrap_or(0.0),
            _ => 0.0,
        })
        .sum()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn ranking<F>(items: &[&Item], size: usize, descending: bool, value: F) -> Vec<Ranked>
where
    F: Fn(&Item) -> Option<f64>,
{
    let mut ranked: Vec<Ranked> = items
        .iter()
        .filter_map(|item| {
            value(item).map(|value| Ranked {
                title: item.title.clone(),
                value,
            })
        })
        .collect();
    // Stable sort keeps log order among ties.
    ranked.sort_by(|a, b| {
        let ordering = a.value.total_cmp(&b.value);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    ranked.truncate(size);
    ranked
}

fn reduce(operation: Operation, items: &[&Item], pages_per_hour: u32) -> Value {
    let rating = |item: &Item| item.rating.map(|rating| rating.as_f64());
    let length = |item: &Item| item.length().and_then(|length| pages(length, pages_per_hour));

    match operation {
        Operation::Count => Value::Count(items.len()),
        Operation::AverageRating => Value::Number(mean(items.iter().filter_map(|item| rating(item)))),
        Operation::AverageLength => Value::Number(mean(items.iter().filter_map(|item| length(item)))),
        Operation::TotalAmount => Value::Number(Some(
            items.iter().map(|item| amount_read(item, pages_per_hour)).sum(),
        )),
        Operation::TopRating(size) => Value::Ranking(ranking(items, size, true, rating)),
        Operation::BottomRating(size) => Value::Ranking(ranking(items, size, false, rating)),
        Operation::TopLength(size) => Value::Ranking(ranking(items, size, true, length)),
    }
}
