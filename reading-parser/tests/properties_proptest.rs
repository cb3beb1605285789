//! Property-based tests for item assembly and experience ordering
//!
//! - trimming an assembled item again changes nothing
//! - no nested list of an assembled item is a lone blank element
//! - ordered, non-overlapping start/end dates parse; swapping two experiences
//!   makes the row invalid

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use reading_parser::reading::error::ParseError;
use reading_parser::reading::item::{Experience, Item, Series, Source, Span, Variant};
use reading_parser::reading::testing::parse_row_on;

fn head_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{2,8}",
        "[A-Z][a-z]{2,6} - [A-Z][a-z]{2,8}",
        "📕[A-Z][a-z]{2,8}",
        "🔊[A-Z][a-z]{2,8} -- in [A-Z][a-z]{2,6}",
        "⚡[A-Z][a-z]{2,8}, 📕[A-Z][a-z]{2,8}",
    ]
}

fn sources_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Z][a-z]{2,8}",
        "[A-Z][a-z]{2,8} [1-9][0-9]{1,2}p",
        "📕[A-Z][a-z]{2,8} 🔊[A-Z][a-z]{2,8} [1-9]:[0-5][0-9]",
    ]
}

fn genres_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z]{3,8}", "[a-z]{3,8}, [a-z]{3,8}"]
}

fn is_lone_default<T: PartialEq + Default>(list: &[T]) -> bool {
    list.len() == 1 && list[0] == T::default()
}

fn has_blank_nested(item: &Item) -> bool {
    is_lone_default::<Variant>(&item.variants)
        || is_lone_default::<Experience>(&item.experiences)
        || item.variants.iter().any(|variant| {
            is_lone_default::<Series>(&variant.series)
                || is_lone_default::<Source>(&variant.sources)
                || is_lone_default::<String>(&variant.extra_info)
        })
        || item
            .experiences
            .iter()
            .any(|experience| is_lone_default::<Span>(&experience.spans))
}

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Experiences 30 days apart, each lasting fewer than 30 days.
fn dated_row(lengths: &[i64]) -> (String, Vec<(NaiveDate, NaiveDate)>) {
    let ranges: Vec<_> = lengths
        .iter()
        .enumerate()
        .map(|(i, length)| {
            let start = base() + Duration::days(30 * i as i64);
            (start, start + Duration::days(*length))
        })
        .collect();
    let starts: Vec<_> = ranges.iter().map(|(start, _)| format_date(*start)).collect();
    let ends: Vec<_> = ranges.iter().map(|(_, end)| format_date(*end)).collect();
    (
        format!("|Sapiens||{}|{}", starts.join(", "), ends.join(", ")),
        ranges,
    )
}

proptest! {
    #[test]
    fn prop_trimming_is_idempotent(
        head in head_strategy(),
        sources in sources_strategy(),
        genres in genres_strategy(),
    ) {
        let line = format!("|{}|{}|||{}", head, sources, genres);
        if let Ok(items) = parse_row_on(&line, 2022, 1, 1) {
            for item in items {
                prop_assert!(!has_blank_nested(&item), "blank nested element in {:?}", item);
                prop_assert_eq!(item.clone().trimmed(), item);
            }
        }
    }

    #[test]
    fn prop_ordered_dates_are_monotonic(lengths in prop::collection::vec(0i64..29, 1..6)) {
        let (line, ranges) = dated_row(&lengths);
        let items = parse_row_on(&line, 2022, 1, 1).unwrap();
        let experiences = &items[0].experiences;
        prop_assert_eq!(experiences.len(), ranges.len());

        let begins: Vec<_> = experiences.iter().filter_map(Experience::first_begin).collect();
        let ends: Vec<_> = experiences
            .iter()
            .filter_map(|experience| experience.last_end().flatten())
            .collect();
        prop_assert!(begins.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!(ends.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn prop_swapped_experiences_are_rejected(
        lengths in prop::collection::vec(0i64..29, 2..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let (_, mut ranges) = dated_row(&lengths);
        let i = pick.index(ranges.len() - 1);
        ranges.swap(i, i + 1);
        let starts: Vec<_> = ranges.iter().map(|(start, _)| format_date(*start)).collect();
        let ends: Vec<_> = ranges.iter().map(|(_, end)| format_date(*end)).collect();
        let line = format!("|Sapiens||{}|{}", starts.join(", "), ends.join(", "));

        let result = parse_row_on(&line, 2022, 1, 1);
        prop_assert!(matches!(result, Err(ParseError::InvalidDate(_))));
    }
}
