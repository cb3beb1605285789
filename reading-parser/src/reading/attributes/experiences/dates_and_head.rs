//! Experiences from the start and end date columns
//!
//! Start and end entries are paired by position, the shorter side padded with
//! blanks. Each pair is one experience with one span whose amount is the
//! length of the experience's variant. Progress is the entry's own, else the
//! head's (last experience only), else complete when an end date is present.

use crate::reading::attributes::{head, shared};
use crate::reading::error::{ParseError, ParseResult};
use crate::reading::item::{DateRange, Experience, Span, Variant};
use crate::reading::length::Progress;
use crate::reading::parsing::fields::{Fields, ParsedRow};
use crate::reading::rows::columns::Column;

pub fn experiences(
    row: &ParsedRow,
    index: usize,
    variants: &[Variant],
) -> ParseResult<Vec<Experience>> {
    let starts = row.segments(&Column::StartDates);
    let ends = row.segments(&Column::EndDates);
    let head_progress = head::progress(row, index);
    let count = starts.len().max(ends.len());

    if count == 0 {
        return Ok(head_progress
            .map(|progress| {
                vec![Experience {
                    spans: vec![Span {
                        amount: variants.first().and_then(|variant| variant.length),
                        progress: Some(progress),
                        ..Span::default()
                    }],
                    ..Experience::default()
                }]
            })
            .unwrap_or_default());
    }

    let blank = Fields::new();
    (0..count)
        .map(|i| {
            let start = starts.get(i).unwrap_or(&blank);
            let end = ends.get(i).unwrap_or(&blank);
            let is_last = i + 1 == count;
            experience(start, end, is_last.then_some(head_progress).flatten(), variants)
        })
        .collect()
}

fn experience(
    start: &Fields,
    end: &Fields,
    head_progress: Option<Progress>,
    variants: &[Variant],
) -> ParseResult<Experience> {
    let begin = start.text("start_date").map(shared::date).transpose()?;
    let finish = end.text("end_date").map(shared::date).transpose()?;
    if let (Some(begin), Some(finish)) = (begin, finish) {
        if finish < begin {
            return Err(ParseError::InvalidDate(format!(
                "end date {} is before start date {}",
                finish, begin
            )));
        }
    }

    let variant_index =
        shared::variant_index(start, variants.len(), Column::StartDates.name())?.unwrap_or(0);
    let progress = shared::progress(start)
        .or(head_progress)
        .or_else(|| finish.map(|_| Progress::Fraction(1.0)));

    let dates = (begin.is_some() || finish.is_some()).then(|| DateRange::new(begin, finish));

    Ok(Experience {
        spans: vec![Span {
            dates,
            amount: variants
                .get(variant_index)
                .and_then(|variant| variant.length),
            progress,
            ..Span::default()
        }],
        group: start.text("group").map(str::to_string),
        variant_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::config::Config;
    use crate::reading::length::Length;
    use crate::reading::parsing::segments::parse_row;
    use crate::reading::rows::classification::classify;
    use crate::reading::rows::splitting::split_columns;
    use chrono::NaiveDate;

    fn run(line: &str) -> ParseResult<Vec<Experience>> {
        let config = Config::default();
        let kind = classify(line, &config);
        let columns = split_columns(line, kind, &config)?;
        let row = parse_row(kind, columns, &config)?;
        let variants = vec![
            Variant {
                length: Some(Length::pages(300)),
                ..Variant::default()
            },
            Variant {
                length: Some(Length::minutes(600)),
                ..Variant::default()
            },
        ];
        experiences(&row, 0, &variants)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pairs_by_position() {
        let experiences = run("|Sapiens||2019/01/01, 2019/06/01 v2|2019/01/20").unwrap();
        assert_eq!(experiences.len(), 2);
        let first = &experiences[0].spans[0];
        assert_eq!(
            first.dates,
            Some(DateRange::closed(date(2019, 1, 1), date(2019, 1, 20)))
        );
        assert_eq!(first.progress, Some(Progress::Fraction(1.0)));
        assert_eq!(first.amount, Some(Length::pages(300)));

        let second = &experiences[1];
        assert_eq!(second.variant_index, 1);
        assert_eq!(
            second.spans[0].dates,
            Some(DateRange::new(Some(date(2019, 6, 1)), None))
        );
        assert_eq!(second.spans[0].progress, None);
        assert_eq!(second.spans[0].amount, Some(Length::minutes(600)));
    }

    #[test]
    fn test_head_progress_applies_to_last_experience() {
        let experiences = run("|DNF 📕Sapiens||2019/01/01|2019/02/01").unwrap();
        assert_eq!(
            experiences[0].spans[0].progress,
            Some(Progress::Fraction(0.0))
        );
    }

    #[test]
    fn test_undated_progress_from_head() {
        let experiences = run("|50% 📕Sapiens").unwrap();
        assert_eq!(experiences.len(), 1);
        assert_eq!(experiences[0].spans[0].dates, None);
        assert_eq!(
            experiences[0].spans[0].progress,
            Some(Progress::Fraction(0.5))
        );
    }

    #[test]
    fn test_end_before_start() {
        assert!(matches!(
            run("|Sapiens||2019/02/01|2019/01/01"),
            Err(ParseError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_group_and_entry_progress() {
        let experiences = run("|Sapiens||2019/01/01 @p50 🤝🏼 book club").unwrap();
        assert_eq!(experiences[0].group.as_deref(), Some("book club"));
        assert_eq!(
            experiences[0].spans[0].progress,
            Some(Progress::Amount(Length::pages(50)))
        );
    }
}
