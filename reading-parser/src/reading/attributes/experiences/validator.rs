//! Experience validation
//!
//! Checks run after either strategy has built the experiences of an item. All
//! violations are [`ParseError::InvalidDate`]. An open end counts as `today`;
//! undated spans are ignored. Two intervals overlap when the later one begins
//! strictly before the earlier one ends, so a shared boundary day is allowed.

use crate::reading::error::{ParseError, ParseResult};
use crate::reading::item::{Experience, Span};
use chrono::NaiveDate;

/// Which cross-experience orderings apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub starts: bool,
    pub ends: bool,
}

pub fn validate(experiences: &[Experience], scope: Scope, today: NaiveDate) -> ParseResult<()> {
    if scope.starts {
        ordered(
            experiences.iter().filter_map(Experience::first_begin),
            "start dates are out of order",
        )?;
    }
    if scope.ends {
        ordered(
            experiences
                .iter()
                .filter_map(Experience::last_end)
                .map(|end| end.unwrap_or(today)),
            "end dates are out of order",
        )?;
    }
    no_variant_overlap(experiences, today)?;
    for experience in experiences {
        spans_in_order(&experience.spans, today)?;
    }
    Ok(())
}

fn ordered(dates: impl Iterator<Item = NaiveDate>, message: &str) -> ParseResult<()> {
    let dates: Vec<NaiveDate> = dates.collect();
    match dates.windows(2).find(|pair| pair[1] < pair[0]) {
        Some(pair) => Err(ParseError::InvalidDate(format!(
            "{}: {} comes after {}",
            message, pair[0], pair[1]
        ))),
        None => Ok(()),
    }
}

/// `[first begin, last end]` of an experience, when it has dated spans.
fn coverage(experience: &Experience, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let begin = experience.first_begin()?;
    let end = experience.last_end()?.unwrap_or(today);
    Some((begin, end))
}

fn no_variant_overlap(experiences: &[Experience], today: NaiveDate) -> ParseResult<()> {
    for (i, earlier) in experiences.iter().enumerate() {
        let Some((earlier_begin, earlier_end)) = coverage(earlier, today) else {
            continue;
        };
        for later in &experiences[i + 1..] {
            if later.variant_index != earlier.variant_index {
                continue;
            }
            let Some((later_begin, later_end)) = coverage(later, today) else {
                continue;
            };
            if earlier_begin.max(later_begin) < earlier_end.min(later_end) {
                return Err(ParseError::InvalidDate(format!(
                    "experiences of the same variant overlap: {}..{} and {}..{}",
                    earlier_begin, earlier_end, later_begin, later_end
                )));
            }
        }
    }
    Ok(())
}

fn spans_in_order(spans: &[Span], today: NaiveDate) -> ParseResult<()> {
    let mut previous: Option<(NaiveDate, NaiveDate)> = None;
    for dates in spans.iter().filter_map(|span| span.dates) {
        let end = dates.end.unwrap_or(today);
        if let Some(begin) = dates.begin {
            if begin > end && dates.end.is_some() {
                return Err(ParseError::InvalidDate(format!(
                    "span {} ends before it begins",
                    dates
                )));
            }
            if let Some((previous_begin, previous_end)) = previous {
                if begin < previous_begin || begin < previous_end {
                    return Err(ParseError::InvalidDate(format!(
                        "span {} overlaps or precedes the span before it",
                        dates
                    )));
                }
            }
            previous = Some((begin, end));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::item::DateRange;

    fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, month, day).unwrap()
    }

    fn experience(ranges: &[(NaiveDate, Option<NaiveDate>)], variant_index: usize) -> Experience {
        Experience {
            spans: ranges
                .iter()
                .map(|(begin, end)| Span {
                    dates: Some(DateRange::new(Some(*begin), *end)),
                    ..Span::default()
                })
                .collect(),
            group: None,
            variant_index,
        }
    }

    const BOTH: Scope = Scope {
        starts: true,
        ends: true,
    };

    #[test]
    fn test_same_variant_overlap_is_invalid() {
        let today = day(12, 31);
        let experiences = vec![
            experience(&[(day(1, 1), Some(day(3, 1)))], 0),
            experience(&[(day(2, 1), None)], 0),
        ];
        assert!(matches!(
            validate(&experiences, BOTH, today),
            Err(ParseError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_other_variant_may_overlap() {
        let today = day(12, 31);
        let experiences = vec![
            experience(&[(day(1, 1), Some(day(3, 1)))], 0),
            experience(&[(day(2, 1), Some(day(4, 1)))], 1),
        ];
        assert!(validate(&experiences, BOTH, today).is_ok());
    }

    #[test]
    fn test_shared_boundary_day_is_allowed() {
        let today = day(12, 31);
        let experiences = vec![experience(
            &[
                (day(12, 6), Some(day(12, 9))),
                (day(12, 9), Some(day(12, 11))),
            ],
            0,
        )];
        assert!(validate(&experiences, BOTH, today).is_ok());
    }

    #[test]
    fn test_out_of_order_starts() {
        let today = day(12, 31);
        let experiences = vec![
            experience(&[(day(5, 1), Some(day(5, 2)))], 0),
            experience(&[(day(1, 1), Some(day(1, 2)))], 1),
        ];
        assert!(validate(&experiences, BOTH, today).is_err());
        let unordered = Scope {
            starts: false,
            ends: false,
        };
        assert!(validate(&experiences, unordered, today).is_ok());
    }

    #[test]
    fn test_backward_span() {
        let today = day(12, 31);
        let experiences = vec![experience(&[(day(5, 2), Some(day(5, 1)))], 0)];
        assert!(validate(&experiences, BOTH, today).is_err());
    }
}
