//! Testing utilities for item assertions
//!
//!     Tests check parsed items through a fluent assertion API instead of
//!     walking the records by hand. Each assertion carries a context path
//!     (`items[0]:experiences[1]:spans[0]`) so a failure names exactly what was
//!     being checked, and record layout changes only touch this module.
//!
//!     ```rust,ignore
//!     use reading_parser::reading::testing::{assert_items, parse_row_on};
//!
//!     let items = parse_row_on("|📕Sapiens|||||||2021/12/6..8 1:30", 2022, 1, 1).unwrap();
//!     assert_items(&items).count(1).item(0, |item| {
//!         item.title("Sapiens").experience(0, |experience| {
//!             experience.span_count(1).span(0, |span| {
//!                 span.dates("2021/12/06", Some("2021/12/08")).amount_display("1:30")
//!             });
//!         });
//!     });
//!     ```

use crate::reading::error::ParseResult;
use crate::reading::item::{Experience, Format, Item, Span, Variant};
use crate::reading::length::{Length, Progress};
use crate::reading::loader::LogParser;
use chrono::NaiveDate;

/// Parse one row with the default configuration on the given day.
pub fn parse_row_on(line: &str, year: i32, month: u32, day: u32) -> ParseResult<Vec<Item>> {
    let today = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    LogParser::with_defaults(today).parse_line(line)
}

pub fn assert_items(items: &[Item]) -> ItemsAssertion<'_> {
    ItemsAssertion { items }
}

pub struct ItemsAssertion<'a> {
    items: &'a [Item],
}

impl<'a> ItemsAssertion<'a> {
    pub fn count(self, expected: usize) -> Self {
        assert_eq!(
            self.items.len(),
            expected,
            "Expected {} items, found {}: {:?}",
            expected,
            self.items.len(),
            self.items.iter().map(|item| &item.title).collect::<Vec<_>>()
        );
        self
    }

    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ItemAssertion<'a>),
    {
        assert!(
            index < self.items.len(),
            "Item index {} out of bounds ({} items)",
            index,
            self.items.len()
        );
        assertion(ItemAssertion {
            item: &self.items[index],
            context: format!("items[{}]", index),
        });
        self
    }
}

pub struct ItemAssertion<'a> {
    item: &'a Item,
    context: String,
}

impl<'a> ItemAssertion<'a> {
    pub fn title(self, expected: &str) -> Self {
        assert_eq!(
            self.item.title, expected,
            "{}: Expected title '{}', got '{}'",
            self.context, expected, self.item.title
        );
        self
    }

    pub fn author(self, expected: Option<&str>) -> Self {
        assert_eq!(
            self.item.author.as_deref(),
            expected,
            "{}: Unexpected author",
            self.context
        );
        self
    }

    pub fn format(self, expected: Option<Format>) -> Self {
        assert_eq!(self.item.format(), expected, "{}: Unexpected format", self.context);
        self
    }

    pub fn genres(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self.item.genres.iter().map(String::as_str).collect();
        assert_eq!(actual, expected, "{}: Unexpected genres", self.context);
        self
    }

    pub fn variant_count(self, expected: usize) -> Self {
        assert_eq!(
            self.item.variants.len(),
            expected,
            "{}: Expected {} variants, found {}",
            self.context,
            expected,
            self.item.variants.len()
        );
        self
    }

    pub fn variant<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(&Variant),
    {
        let variant = self.item.variants.get(index).unwrap_or_else(|| {
            panic!("{}: Variant index {} out of bounds", self.context, index)
        });
        assertion(variant);
        self
    }

    pub fn experience_count(self, expected: usize) -> Self {
        assert_eq!(
            self.item.experiences.len(),
            expected,
            "{}: Expected {} experiences, found {}",
            self.context,
            expected,
            self.item.experiences.len()
        );
        self
    }

    pub fn experience<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ExperienceAssertion<'a>),
    {
        let experience = self.item.experiences.get(index).unwrap_or_else(|| {
            panic!("{}: Experience index {} out of bounds", self.context, index)
        });
        assertion(ExperienceAssertion {
            experience,
            context: format!("{}:experiences[{}]", self.context, index),
        });
        self
    }
}

pub struct ExperienceAssertion<'a> {
    experience: &'a Experience,
    context: String,
}

impl<'a> ExperienceAssertion<'a> {
    pub fn span_count(self, expected: usize) -> Self {
        assert_eq!(
            self.experience.spans.len(),
            expected,
            "{}: Expected {} spans, found {}: {:?}",
            self.context,
            expected,
            self.experience.spans.len(),
            self.experience.spans
        );
        self
    }

    pub fn group(self, expected: Option<&str>) -> Self {
        assert_eq!(
            self.experience.group.as_deref(),
            expected,
            "{}: Unexpected group",
            self.context
        );
        self
    }

    pub fn variant_index(self, expected: usize) -> Self {
        assert_eq!(
            self.experience.variant_index, expected,
            "{}: Unexpected variant index",
            self.context
        );
        self
    }

    pub fn span<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(SpanAssertion<'a>),
    {
        let span = self.experience.spans.get(index).unwrap_or_else(|| {
            panic!("{}: Span index {} out of bounds", self.context, index)
        });
        assertion(SpanAssertion {
            span,
            context: format!("{}:spans[{}]", self.context, index),
        });
        self
    }
}

pub struct SpanAssertion<'a> {
    span: &'a Span,
    context: String,
}

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y/%m/%d")
        .unwrap_or_else(|_| panic!("'{}' is not a yyyy/mm/dd date", text))
}

impl SpanAssertion<'_> {
    /// Expected bounds as `yyyy/mm/dd`; `None` for an open end.
    pub fn dates(self, begin: &str, end: Option<&str>) -> Self {
        let dates = self
            .span
            .dates
            .unwrap_or_else(|| panic!("{}: Expected a dated span", self.context));
        assert_eq!(dates.begin, Some(date(begin)), "{}: Unexpected begin", self.context);
        assert_eq!(dates.end, end.map(date), "{}: Unexpected end", self.context);
        self
    }

    pub fn undated(self) -> Self {
        assert!(
            self.span.dates.is_none(),
            "{}: Expected an undated span, got {:?}",
            self.context,
            self.span.dates
        );
        self
    }

    pub fn amount(self, expected: Length) -> Self {
        assert_eq!(self.span.amount, Some(expected), "{}: Unexpected amount", self.context);
        self
    }

    /// Compares the displayed amount (`h:mm` or `Np`).
    pub fn amount_display(self, expected: &str) -> Self {
        let actual = self.span.amount.map(|amount| amount.to_string());
        assert_eq!(
            actual.as_deref(),
            Some(expected),
            "{}: Unexpected amount",
            self.context
        );
        self
    }

    pub fn progress(self, expected: Option<Progress>) -> Self {
        assert_eq!(self.span.progress, expected, "{}: Unexpected progress", self.context);
        self
    }

    pub fn name(self, expected: Option<&str>) -> Self {
        assert_eq!(self.span.name.as_deref(), expected, "{}: Unexpected name", self.context);
        self
    }

    pub fn favorite(self, expected: bool) -> Self {
        assert_eq!(self.span.favorite, expected, "{}: Unexpected favorite", self.context);
        self
    }
}
