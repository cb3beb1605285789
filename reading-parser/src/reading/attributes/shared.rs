//! Conversions shared by several attribute transformers.

use crate::reading::error::{ParseError, ParseResult};
use crate::reading::length::{Length, Progress};
use crate::reading::parsing::fields::Fields;
use chrono::NaiveDate;

/// Reason given when amount arithmetic overflows.
pub const AMOUNT_TOO_LARGE: &str = "amount too large";

/// An `xN` repetition count.
pub fn repetitions(text: &str, column: &str) -> ParseResult<i64> {
    text.parse().map_err(|_| {
        ParseError::parsing_with_reason(column, format!("x{}", text), "repetition count out of range")
    })
}

/// Progress from `dnf` and `progress` captures. DNF alone means 0%.
pub fn progress(fields: &Fields) -> Option<Progress> {
    match (fields.text("progress"), fields.has("dnf")) {
        (Some(text), _) => Progress::parse(text),
        (None, true) => Some(Progress::Fraction(0.0)),
        (None, false) => None,
    }
}

/// Length from `length_pages` or `length_time` captures.
pub fn length(fields: &Fields) -> Option<Length> {
    if let Some(pages) = fields.text("length_pages") {
        return Length::parse_pages(pages);
    }
    fields.text("length_time").and_then(Length::parse_time)
}

/// A full `yyyy/m/d` date.
pub fn date(text: &str) -> ParseResult<NaiveDate> {
    let invalid = || ParseError::InvalidDate(format!("\"{}\" is not a valid date", text));
    let mut parts = text.trim().split('/');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let year = year.parse().map_err(|_| invalid())?;
    let month = month.parse().map_err(|_| invalid())?;
    let day = day.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// 1-based `vN` index to a 0-based variant index.
pub fn variant_index(
    fields: &Fields,
    variant_count: usize,
    column: &str,
) -> ParseResult<Option<usize>> {
    let Some(text) = fields.text("variant") else {
        return Ok(None);
    };
    match text.parse::<usize>() {
        Ok(number) if number >= 1 && number <= variant_count.max(1) => Ok(Some(number - 1)),
        _ => Err(ParseError::parsing_with_reason(
            column,
            format!("v{}", text),
            format!("no such variant (the item has {})", variant_count.max(1)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::parsing::fields::Value;

    #[test]
    fn test_repetitions_out_of_range() {
        assert_eq!(repetitions("12", "history"), Ok(12));
        assert_eq!(
            repetitions("99999999999999999999", "history"),
            Err(ParseError::parsing_with_reason(
                "history",
                "x99999999999999999999",
                "repetition count out of range"
            ))
        );
    }

    #[test]
    fn test_date_accepts_unpadded_parts() {
        assert_eq!(
            date("2021/1/8").unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 8).unwrap()
        );
        assert!(matches!(date("2021/2/30"), Err(ParseError::InvalidDate(_))));
        assert!(matches!(date("2021/2"), Err(ParseError::InvalidDate(_))));
    }

    #[test]
    fn test_dnf_alone_is_zero_progress() {
        let mut fields = Fields::new();
        fields.insert("dnf", Value::Text("DNF".to_string()));
        assert_eq!(progress(&fields), Some(Progress::Fraction(0.0)));
        fields.insert("progress", Value::Text("50%".to_string()));
        assert_eq!(progress(&fields), Some(Progress::Fraction(0.5)));
    }

    #[test]
    fn test_variant_index_bounds() {
        let mut fields = Fields::new();
        fields.insert("variant", Value::Text("2".to_string()));
        assert_eq!(variant_index(&fields, 2, "history").unwrap(), Some(1));
        assert!(variant_index(&fields, 1, "history").is_err());
        assert_eq!(variant_index(&Fields::new(), 1, "history").unwrap(), None);
    }
}
