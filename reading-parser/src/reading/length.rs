//! Lengths and amounts
//!
//! A [`Length`] is either a page count or a reading time. Both are kept as exact
//! rationals (time in minutes) so that splitting an amount across many days and
//! multiplying it back never drifts. Times display as `h:mm`.

use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub};
use serde::{Serialize, Serializer};
use std::fmt;

/// Exact rational used for all amount arithmetic.
pub type Rational = Ratio<i64>;

/// Average number of days in a month, used for `/month` frequencies.
pub const AVERAGE_DAYS_IN_A_MONTH: (i64, i64) = (30437, 1000);

pub fn rational(n: i64) -> Rational {
    Ratio::from_integer(n)
}

/// A progress fraction as a rational, to four decimal places.
pub fn fraction_to_rational(fraction: f64) -> Rational {
    Ratio::new((fraction * 10_000.0).round() as i64, 10_000)
}

fn zero() -> Rational {
    Ratio::from_integer(0)
}

/// A page count or a reading time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Length {
    Pages(Rational),
    /// Minutes
    Time(Rational),
}

impl Length {
    pub fn pages(pages: i64) -> Self {
        Length::Pages(rational(pages))
    }

    pub fn minutes(minutes: i64) -> Self {
        Length::Time(rational(minutes))
    }

    /// Parse `h:mm` (hours may have any number of digits, minutes exactly two).
    pub fn parse_time(text: &str) -> Option<Self> {
        let (hours, minutes) = text.trim().split_once(':')?;
        if minutes.len() != 2 || hours.is_empty() {
            return None;
        }
        let hours: i64 = hours.parse().ok()?;
        let minutes: i64 = minutes.parse().ok()?;
        if minutes >= 60 {
            return None;
        }
        let total = hours.checked_mul(60)?.checked_add(minutes)?;
        Some(Length::minutes(total))
    }

    /// Parse a page count written as `123`, `123p` or `p123`.
    pub fn parse_pages(text: &str) -> Option<Self> {
        let text = text.trim();
        let digits = text
            .strip_suffix('p')
            .or_else(|| text.strip_prefix('p'))
            .unwrap_or(text);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Length::pages)
    }

    /// Parse either a time or a page count.
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_time(text).or_else(|| Self::parse_pages(text))
    }

    pub fn value(&self) -> Rational {
        match self {
            Length::Pages(value) | Length::Time(value) => *value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value() == zero()
    }

    pub fn is_time(&self) -> bool {
        matches!(self, Length::Time(_))
    }

    /// Same unit, value multiplied by `factor`. `None` on overflow.
    pub fn scale(self, factor: Rational) -> Option<Self> {
        self.value()
            .checked_mul(&factor)
            .map(|value| self.with_value(value))
    }

    pub fn to_minutes(self, pages_per_hour: u32) -> Option<Rational> {
        match self {
            Length::Pages(pages) => pages
                .checked_mul(&rational(60))?
                .checked_div(&rational(i64::from(pages_per_hour))),
            Length::Time(minutes) => Some(minutes),
        }
    }

    pub fn to_pages(self, pages_per_hour: u32) -> Option<Rational> {
        match self {
            Length::Pages(pages) => Some(pages),
            Length::Time(minutes) => minutes
                .checked_mul(&rational(i64::from(pages_per_hour)))?
                .checked_div(&rational(60)),
        }
    }

    /// Converts `other` into this length's unit.
    fn same_unit(self, other: Length, pages_per_hour: u32) -> Option<Rational> {
        match self {
            Length::Pages(_) => other.to_pages(pages_per_hour),
            Length::Time(_) => other.to_minutes(pages_per_hour),
        }
    }

    /// Sum in this length's unit. `None` on overflow.
    pub fn plus(self, other: Length, pages_per_hour: u32) -> Option<Self> {
        let other = self.same_unit(other, pages_per_hour)?;
        self.value()
            .checked_add(&other)
            .map(|value| self.with_value(value))
    }

    /// Difference in this length's unit, never below zero.
    pub fn saturating_minus(self, other: Length, pages_per_hour: u32) -> Option<Self> {
        let other = self.same_unit(other, pages_per_hour)?;
        let value = self.value().checked_sub(&other)?;
        Some(self.with_value(if value < zero() { zero() } else { value }))
    }

    fn with_value(self, value: Rational) -> Self {
        match self {
            Length::Pages(_) => Length::Pages(value),
            Length::Time(_) => Length::Time(value),
        }
    }
}

fn rational_to_f64(value: Rational) -> f64 {
    *value.numer() as f64 / *value.denom() as f64
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Pages(pages) if pages.is_integer() => write!(f, "{}p", pages.to_integer()),
            Length::Pages(pages) => write!(f, "{:.2}p", rational_to_f64(*pages)),
            Length::Time(minutes) => {
                let total = minutes.round().to_integer();
                write!(f, "{}:{:02}", total / 60, total % 60)
            }
        }
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Length::Pages(pages) if pages.is_integer() => {
                serializer.serialize_i64(pages.to_integer())
            }
            Length::Pages(pages) => serializer.serialize_f64(rational_to_f64(*pages)),
            Length::Time(_) => serializer.collect_str(self),
        }
    }
}

/// How far into an item a reading got
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    /// 0.0 to 1.0
    Fraction(f64),
    /// Page reached or time listened
    Amount(Length),
}

impl Progress {
    /// Parse `50%`, `p30`, `30p` or `1:30`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().trim_start_matches('@');
        if let Some(percent) = text.strip_suffix('%') {
            let percent: f64 = percent.parse().ok()?;
            return Some(Progress::Fraction(percent / 100.0));
        }
        if let Some(time) = Length::parse_time(text) {
            return Some(Progress::Amount(time));
        }
        if text.starts_with('p') || text.ends_with('p') {
            return Length::parse_pages(text).map(Progress::Amount);
        }
        None
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Progress::Fraction(f) if *f >= 1.0)
    }
}

impl Serialize for Progress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Progress::Fraction(fraction) => serializer.serialize_f64(*fraction),
            Progress::Amount(length) => length.serialize(serializer),
        }
    }
}
