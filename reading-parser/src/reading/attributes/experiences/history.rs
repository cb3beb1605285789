//! History expansion
//!
//!     The history column is a list of experience groups, each a list of
//!     entries. Entries are folded left over an explicit [`Fold`] state: every
//!     step takes the fold by value and returns the next one, so the only state
//!     carried between entries is what the fold names.
//!
//! Dates
//!
//!     Entries may omit the year and month and inherit them from the previous
//!     entry; a month earlier than the inherited one rolls into the next year.
//!     A dated entry never starts before the previous dated entry's start.
//!     An entry without a date falls on the day after the previous entry. A
//!     range without a start (`..12/13`) starts on that day as well.
//!
//! Amounts
//!
//!     Explicit amount, else the last explicit amount, else the episodic length,
//!     else the recorded progress against the variant's length. Anything else
//!     is an error. `xN` multiplies the amount and `/day`, `/week`, `/month`
//!     multiply it by the number of periods in the entry's range.
//!
//! Day slots
//!
//!     Closed entries spread their total evenly (exact rationals) over their
//!     days. Slots are keyed by name and date; a later slot with the same key
//!     replaces the earlier one in place. Exception entries (`not ...`) remove
//!     slots as they are met, so a fixed total spread before an exception loses
//!     the share of the excluded days. After the fold, zero slots are dropped and
//!     consecutive days with identical amount and metadata merge into spans.
//!
//! Open ranges
//!
//!     `start..` opens a range whose end is decided later: by `..end`, by the
//!     next dated entry (the day before it) or, at the end of the group, by
//!     today. Entries inside it share its days in proportion to their totals and
//!     each becomes one span. A range closed by today keeps an open end.

use crate::reading::attributes::{shared, variants};
use crate::reading::config::Config;
use crate::reading::error::{ParseError, ParseResult};
use crate::reading::item::{DateRange, Experience, Span, Variant};
use crate::reading::length::{
    fraction_to_rational, rational, Length, Progress, Rational, AVERAGE_DAYS_IN_A_MONTH,
};
use crate::reading::parsing::fields::{Fields, ParsedRow};
use crate::reading::parsing::grammar::Grammar;
use crate::reading::rows::columns::Column;
use chrono::{Datelike, Duration, NaiveDate};
use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul};
use std::collections::BTreeMap;
use tracing::{debug, trace};

const MISSING_AMOUNT: &str = "missing length or amount";

fn too_large() -> ParseError {
    ParseError::InvalidHistory(shared::AMOUNT_TOO_LARGE.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frequency {
    Day,
    Week,
    Month,
}

impl Frequency {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "day" => Some(Frequency::Day),
            "week" => Some(Frequency::Week),
            "month" => Some(Frequency::Month),
            _ => None,
        }
    }

    /// Number of periods in `days` days.
    fn periods(self, days: i64) -> Rational {
        match self {
            Frequency::Day => rational(days),
            Frequency::Week => Ratio::new(days, 7),
            Frequency::Month => {
                let (numer, denom) = AVERAGE_DAYS_IN_A_MONTH;
                Ratio::new(days * denom, numer)
            }
        }
    }
}

/// An amount with its repetition count and frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rate {
    amount: Length,
    repetitions: i64,
    frequency: Option<Frequency>,
}

impl Rate {
    fn once(amount: Length) -> Self {
        Self {
            amount,
            repetitions: 1,
            frequency: None,
        }
    }

    fn total(&self, days: i64) -> ParseResult<Length> {
        let periods = self
            .frequency
            .map_or(rational(1), |frequency| frequency.periods(days));
        rational(self.repetitions)
            .checked_mul(&periods)
            .and_then(|factor| self.amount.scale(factor))
            .ok_or_else(too_large)
    }
}

/// Date components as written; any of them may be inherited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DatePart {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

impl DatePart {
    fn new(year: Option<&str>, month: Option<&str>, day: Option<&str>) -> Self {
        Self {
            year: year.and_then(|y| y.parse().ok()),
            month: month.and_then(|m| m.parse().ok()),
            day: day.and_then(|d| d.parse().ok()),
        }
    }

    fn from_fields(fields: &Fields, prefix: &str) -> Self {
        let field = |name: &str| fields.text(&format!("{}_{}", prefix, name));
        Self::new(field("year"), field("month"), field("day"))
    }

    fn is_dated(&self) -> bool {
        self.day.is_some()
    }

    /// The full date, filling missing parts from `base`.
    fn resolve(&self, base: Option<NaiveDate>) -> ParseResult<NaiveDate> {
        let missing = || ParseError::InvalidHistory("missing date: the first entry needs a full date".to_string());
        let day = self.day.ok_or_else(missing)?;
        let (year, month) = match (self.year, self.month, base) {
            (Some(year), Some(month), _) => (year, month),
            (Some(year), None, Some(base)) => (year, base.month()),
            (None, Some(month), Some(base)) if month < base.month() => (base.year() + 1, month),
            (None, Some(month), Some(base)) => (base.year(), month),
            (None, None, Some(base)) => (base.year(), base.month()),
            _ => return Err(missing()),
        };
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ParseError::InvalidHistory(format!("{}/{}/{} is not a valid date", year, month, day))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Session {
    planned: bool,
    start: DatePart,
    range: bool,
    end: DatePart,
    rate: Option<Rate>,
    dnf: bool,
    progress: Option<Progress>,
    favorite: bool,
    name: Option<String>,
}

impl Session {
    /// Progress recorded on the span: explicit, else 0% for DNF.
    fn span_progress(&self) -> Option<Progress> {
        self.progress
            .or_else(|| self.dnf.then_some(Progress::Fraction(0.0)))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Exception(Vec<String>),
    Session(Session),
}

impl Entry {
    fn parse(fields: &Fields) -> ParseResult<Self> {
        if fields.has("except_dates") {
            let dates = fields
                .present("except_dates")
                .into_iter()
                .map(str::to_string)
                .collect();
            return Ok(Entry::Exception(dates));
        }

        let rate = match fields.text("amount") {
            Some(text) => {
                let amount = Length::parse(text).ok_or_else(|| {
                    ParseError::parsing_with_reason(Column::History.name(), text, "not an amount")
                })?;
                let repetitions = match fields.text("repetitions") {
                    Some(count) => shared::repetitions(count, Column::History.name())?,
                    None => 1,
                };
                Some(Rate {
                    amount,
                    repetitions,
                    frequency: fields.text("frequency").and_then(Frequency::parse),
                })
            }
            None => None,
        };

        Ok(Entry::Session(Session {
            planned: fields.has("planned"),
            start: DatePart::from_fields(fields, "start"),
            range: fields.has("range"),
            end: DatePart::from_fields(fields, "end"),
            rate,
            dnf: fields.has("dnf"),
            progress: fields.text("progress").and_then(Progress::parse),
            favorite: fields.has("favorite"),
            name: fields.text("name").map(str::to_string),
        }))
    }
}

/// What one day (or one open-range share) records.
#[derive(Debug, Clone, PartialEq)]
struct Draft {
    amount: Length,
    progress: Option<Progress>,
    name: Option<String>,
    favorite: bool,
    from_progress: bool,
}

/// Day slots are keyed by session name, then date, so each name's days are
/// contiguous when merging.
type SlotKey = (Option<String>, NaiveDate);

#[derive(Debug, Clone, PartialEq)]
struct OpenEntry {
    rate: Rate,
    from_progress: bool,
    progress: Option<Progress>,
    name: Option<String>,
    favorite: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct OpenRange {
    start: NaiveDate,
    entries: Vec<OpenEntry>,
}

/// State carried from one entry to the next.
#[derive(Debug, Clone, Default, PartialEq)]
struct Active {
    /// Start of the latest dated entry; exceptions resolve against it.
    last_start: Option<NaiveDate>,
    /// Last day covered so far; later entries resolve against it.
    last_day: Option<NaiveDate>,
    /// The last explicit amount.
    rate: Option<Rate>,
}

impl Active {
    fn base(&self) -> Option<NaiveDate> {
        self.last_day.or(self.last_start)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Fold {
    active: Active,
    slots: BTreeMap<SlotKey, Draft>,
    open: Option<OpenRange>,
    /// Spans of closed open ranges.
    ranged: Vec<Span>,
    planned: Vec<Span>,
    planning: bool,
    /// Sum of all totals so far, for relativizing progress-derived amounts.
    running: Option<Length>,
}

/// Per-group constants.
struct Reconciler<'a> {
    grammar: &'a Grammar,
    variant_length: Option<Length>,
    episodic: Option<Length>,
    pages_per_hour: u32,
    today: NaiveDate,
}

pub fn experiences(
    row: &ParsedRow,
    item_variants: &[Variant],
    config: &Config,
    today: NaiveDate,
) -> ParseResult<Vec<Experience>> {
    let episodic = variants::episodic_length(row);
    row.groups(&Column::History)
        .iter()
        .map(|entries| group(entries, item_variants, episodic, config, today))
        .collect()
}

fn group(
    entries: &[Fields],
    item_variants: &[Variant],
    episodic: Option<Length>,
    config: &Config,
    today: NaiveDate,
) -> ParseResult<Experience> {
    let variant_index = entries
        .iter()
        .find_map(|fields| {
            shared::variant_index(fields, item_variants.len(), Column::History.name()).transpose()
        })
        .transpose()?
        .unwrap_or(0);

    let reconciler = Reconciler {
        grammar: config.grammar(),
        variant_length: item_variants
            .get(variant_index)
            .and_then(|variant| variant.length),
        episodic,
        pages_per_hour: config.pages_per_hour(),
        today,
    };

    let fold = entries
        .iter()
        .map(Entry::parse)
        .try_fold(Fold::default(), |fold, entry| reconciler.step(fold, entry?))?;

    Ok(Experience {
        spans: reconciler.finish(fold)?,
        group: entries
            .iter()
            .find_map(|fields| fields.text("group"))
            .map(str::to_string),
        variant_index,
    })
}

fn next_day(date: NaiveDate) -> ParseResult<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| ParseError::InvalidHistory(format!("no day after {}", date)))
}

fn previous_day(date: NaiveDate) -> ParseResult<NaiveDate> {
    date.pred_opt()
        .ok_or_else(|| ParseError::InvalidHistory(format!("no day before {}", date)))
}

fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

impl Reconciler<'_> {
    fn step(&self, fold: Fold, entry: Entry) -> ParseResult<Fold> {
        trace!(?entry, "history entry");
        match entry {
            Entry::Exception(dates) => self.except(fold, &dates),
            Entry::Session(session) => self.session(fold, session),
        }
    }

    fn session(&self, mut fold: Fold, session: Session) -> ParseResult<Fold> {
        let undated = !session.start.is_dated() && !session.range;
        if session.planned || (fold.planning && undated) {
            return self.plan(fold, &session);
        }
        fold.planning = false;

        let has_end = session.end.is_dated();
        match (session.start.is_dated(), session.range) {
            (true, true) if !has_end => {
                let start = session.start.resolve(fold.active.base())?;
                let fold = self.close_before(fold, start)?;
                self.open(fold, &session, start)
            }
            (true, range) => {
                let start = session.start.resolve(fold.active.base())?;
                let fold = self.close_before(fold, start)?;
                let end = if range {
                    session.end.resolve(Some(start))?
                } else {
                    start
                };
                self.closed(fold, &session, start, end)
            }
            (false, range) => match fold.open.take() {
                Some(mut open) => {
                    let entry = self.open_entry(&mut fold, &session)?;
                    open.entries.push(entry);
                    if range && has_end {
                        let end = session.end.resolve(Some(open.start))?;
                        self.close(fold, open, end, false)
                    } else {
                        fold.open = Some(open);
                        Ok(fold)
                    }
                }
                None => {
                    let start = self.following_day(&fold)?;
                    match (range, has_end) {
                        (true, false) => self.open(fold, &session, start),
                        (true, true) => {
                            let end = session.end.resolve(Some(start))?;
                            self.closed(fold, &session, start, end)
                        }
                        (false, _) => self.closed(fold, &session, start, start),
                    }
                }
            },
        }
    }

    fn following_day(&self, fold: &Fold) -> ParseResult<NaiveDate> {
        match fold.active.last_day {
            Some(last_day) => next_day(last_day),
            None => Err(ParseError::InvalidHistory(
                "missing date: the first entry needs a full date".to_string(),
            )),
        }
    }

    /// Amount precedence: explicit, carried, episodic, progress.
    fn rate(&self, active: &mut Active, session: &Session) -> ParseResult<(Rate, bool)> {
        if let Some(rate) = session.rate {
            active.rate = Some(rate);
            return Ok((rate, false));
        }
        if let Some(rate) = active.rate {
            return Ok((rate, false));
        }
        if let Some(episodic) = self.episodic {
            return Ok((Rate::once(episodic), false));
        }
        match (session.progress, self.variant_length) {
            (Some(Progress::Amount(amount)), _) => Ok((Rate::once(amount), true)),
            (Some(Progress::Fraction(fraction)), Some(length)) => {
                let amount = length
                    .scale(fraction_to_rational(fraction))
                    .ok_or_else(too_large)?;
                Ok((Rate::once(amount), true))
            }
            _ => Err(ParseError::InvalidHistory(MISSING_AMOUNT.to_string())),
        }
    }

    /// Progress-derived totals count from the running total; every total adds to it.
    fn relativize(&self, fold: &mut Fold, total: Length, from_progress: bool) -> ParseResult<Length> {
        let total = match (from_progress, fold.running) {
            (true, Some(running)) => total
                .saturating_minus(running, self.pages_per_hour)
                .ok_or_else(too_large)?,
            _ => total,
        };
        fold.running = Some(match fold.running {
            Some(running) => running
                .plus(total, self.pages_per_hour)
                .ok_or_else(too_large)?,
            None => total,
        });
        Ok(total)
    }

    /// Dated entries may not go back before the latest dated start.
    fn ensure_forward(&self, fold: &Fold, start: NaiveDate) -> ParseResult<()> {
        match fold.active.last_start {
            Some(last_start) if start < last_start => Err(ParseError::InvalidHistory(format!(
                "{} comes before the previous entry ({})",
                start, last_start
            ))),
            _ => Ok(()),
        }
    }

    fn closed(
        &self,
        mut fold: Fold,
        session: &Session,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ParseResult<Fold> {
        self.ensure_forward(&fold, start)?;
        if end < start {
            return Err(ParseError::InvalidHistory(format!(
                "range {}..{} ends before it begins",
                start, end
            )));
        }
        let (rate, from_progress) = self.rate(&mut fold.active, session)?;
        let days = days_between(start, end);
        let total = self.relativize(&mut fold, rate.total(days)?, from_progress)?;
        let draft = Draft {
            amount: total.scale(Ratio::new(1, days)).ok_or_else(too_large)?,
            progress: session.span_progress(),
            name: session.name.clone(),
            favorite: session.favorite,
            from_progress,
        };

        for date in start.iter_days().take(days as usize) {
            fold.slots.insert((draft.name.clone(), date), draft.clone());
        }

        fold.active.last_start = Some(start);
        fold.active.last_day = Some(end);
        Ok(fold)
    }

    fn open_entry(&self, fold: &mut Fold, session: &Session) -> ParseResult<OpenEntry> {
        let (rate, from_progress) = self.rate(&mut fold.active, session)?;
        Ok(OpenEntry {
            rate,
            from_progress,
            progress: session.span_progress(),
            name: session.name.clone(),
            favorite: session.favorite,
        })
    }

    fn open(&self, mut fold: Fold, session: &Session, start: NaiveDate) -> ParseResult<Fold> {
        self.ensure_forward(&fold, start)?;
        if start > self.today {
            return Err(ParseError::InvalidHistory(format!(
                "open range starts in the future ({})",
                start
            )));
        }
        let entry = self.open_entry(&mut fold, session)?;
        fold.open = Some(OpenRange {
            start,
            entries: vec![entry],
        });
        fold.active.last_start = Some(start);
        Ok(fold)
    }

    /// Close an open range on the day before `start`.
    fn close_before(&self, mut fold: Fold, start: NaiveDate) -> ParseResult<Fold> {
        match fold.open.take() {
            Some(open) => {
                let end = previous_day(start)?;
                self.close(fold, open, end, false)
            }
            None => Ok(fold),
        }
    }

    /// Share the range's days among its entries in proportion to their totals.
    /// Entry `i` covers day indices `floor(c[i-1])..=ceil(c[i]) - 1`, where `c`
    /// are the cumulative proportional positions.
    fn close(
        &self,
        mut fold: Fold,
        open: OpenRange,
        end: NaiveDate,
        implicit: bool,
    ) -> ParseResult<Fold> {
        if end < open.start {
            return Err(ParseError::InvalidHistory(format!(
                "open range from {} ends before it begins ({})",
                open.start, end
            )));
        }
        let days = days_between(open.start, end);
        let totals = open
            .entries
            .iter()
            .map(|entry| {
                let total = entry.rate.total(days)?;
                self.relativize(&mut fold, total, entry.from_progress)
            })
            .collect::<ParseResult<Vec<Length>>>()?;

        let weights = totals
            .iter()
            .map(|total| total.to_minutes(self.pages_per_hour).ok_or_else(too_large))
            .collect::<ParseResult<Vec<Rational>>>()?;
        let sum = checked_sum(&weights)?;
        let weights = if sum == rational(0) {
            vec![rational(1); weights.len()]
        } else {
            weights
        };
        let sum = checked_sum(&weights)?;

        let last = open.entries.len().saturating_sub(1);
        let mut cumulative = rational(0);
        let mut previous_position = rational(0);
        for (i, (entry, total)) in open.entries.into_iter().zip(totals).enumerate() {
            cumulative = cumulative.checked_add(&weights[i]).ok_or_else(too_large)?;
            let position = rational(days)
                .checked_mul(&cumulative)
                .and_then(|scaled| scaled.checked_div(&sum))
                .ok_or_else(too_large)?;
            let first = previous_position.floor().to_integer();
            let final_day = (position.ceil().to_integer() - 1).max(first);
            previous_position = position;
            if total.is_zero() {
                continue;
            }

            let begin = open.start + Duration::days(first);
            let finish = open.start + Duration::days(final_day);
            let finish = if implicit && i == last {
                None
            } else {
                Some(finish)
            };
            fold.ranged.push(Span {
                dates: Some(DateRange::new(Some(begin), finish)),
                amount: Some(total),
                progress: entry.progress,
                name: entry.name,
                favorite: entry.favorite,
            });
        }

        if implicit {
            debug!(start = %open.start, today = %end, "open range closed at today");
        }
        fold.active.last_day = Some(end);
        Ok(fold)
    }

    fn except(&self, mut fold: Fold, dates: &[String]) -> ParseResult<Fold> {
        if fold.open.is_some() {
            return Err(ParseError::InvalidHistory(
                "exceptions are not allowed inside an open range".to_string(),
            ));
        }
        let base = fold.active.last_start;
        for text in dates {
            let captures = self.grammar.history_date.captures(text).ok_or_else(|| {
                ParseError::parsing_with_reason(
                    Column::History.name(),
                    text.as_str(),
                    "not a date or date range",
                )
            })?;
            let part = |prefix: &str| {
                DatePart::new(
                    captures.name(&format!("{}_year", prefix)).map(|m| m.as_str()),
                    captures.name(&format!("{}_month", prefix)).map(|m| m.as_str()),
                    captures.name(&format!("{}_day", prefix)).map(|m| m.as_str()),
                )
            };
            let start = part("start").resolve(base)?;
            let end = part("end");
            let end = if end.is_dated() {
                end.resolve(Some(start))?
            } else {
                start
            };
            fold.slots
                .retain(|(_, date), _| *date < start || *date > end);
        }
        Ok(fold)
    }

    fn plan(&self, mut fold: Fold, session: &Session) -> ParseResult<Fold> {
        if let Some(rate) = session.rate {
            fold.active.rate = Some(rate);
        }
        let rate = session
            .rate
            .or(fold.active.rate)
            .or_else(|| self.episodic.map(Rate::once));
        fold.planned.push(Span {
            dates: None,
            amount: rate.map(|rate| rate.total(1)).transpose()?,
            progress: session.span_progress(),
            name: session.name.clone(),
            favorite: session.favorite,
        });
        fold.planning = true;
        Ok(fold)
    }

    fn finish(&self, fold: Fold) -> ParseResult<Vec<Span>> {
        let mut fold = fold;
        if let Some(open) = fold.open.take() {
            fold = self.close(fold, open, self.today, true)?;
        }

        let slots = fold
            .slots
            .into_iter()
            .filter(|(_, draft)| !draft.amount.is_zero())
            .map(|((_, date), draft)| (date, draft));

        let mut spans = merge_days(slots)?;
        spans.extend(fold.ranged);
        spans.sort_by_key(|span| span.dates.and_then(|dates| dates.begin));
        spans.extend(fold.planned);
        Ok(spans)
    }
}

fn checked_sum(values: &[Rational]) -> ParseResult<Rational> {
    values
        .iter()
        .try_fold(rational(0), |sum, value| sum.checked_add(value))
        .ok_or_else(too_large)
}

/// Consecutive days with identical drafts become one span.
fn merge_days(slots: impl Iterator<Item = (NaiveDate, Draft)>) -> ParseResult<Vec<Span>> {
    struct Run {
        begin: NaiveDate,
        end: NaiveDate,
        days: i64,
        draft: Draft,
    }

    let finish = |run: Run| -> ParseResult<Span> {
        Ok(Span {
            dates: Some(DateRange::closed(run.begin, run.end)),
            amount: Some(
                run.draft
                    .amount
                    .scale(rational(run.days))
                    .ok_or_else(too_large)?,
            ),
            progress: run.draft.progress,
            name: run.draft.name,
            favorite: run.draft.favorite,
        })
    };

    let mut spans = Vec::new();
    let mut current: Option<Run> = None;
    for (date, draft) in slots {
        match current.as_mut() {
            Some(run) if run.draft == draft && run.end.succ_opt() == Some(date) => {
                run.end = date;
                run.days += 1;
            }
            _ => {
                if let Some(run) = current.take() {
                    spans.push(finish(run)?);
                }
                current = Some(Run {
                    begin: date,
                    end: date,
                    days: 1,
                    draft,
                });
            }
        }
    }
    if let Some(run) = current {
        spans.push(finish(run)?);
    }
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::parsing::segments::parse_row;
    use crate::reading::rows::classification::classify;
    use crate::reading::rows::splitting::split_columns;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn run_with(history: &str, length: Option<Length>, today: NaiveDate) -> ParseResult<Vec<Experience>> {
        let config = Config::default();
        let line = format!("|Item|||||||{}", history);
        let kind = classify(&line, &config);
        let columns = split_columns(&line, kind, &config)?;
        let row = parse_row(kind, columns, &config)?;
        let item_variants = vec![Variant {
            length,
            ..Variant::default()
        }];
        experiences(&row, &item_variants, &config, today)
    }

    fn spans(history: &str) -> Vec<Span> {
        run_with(history, None, date(2022, 6, 1)).unwrap().remove(0).spans
    }

    fn dated(span: &Span) -> (NaiveDate, Option<NaiveDate>) {
        let dates = span.dates.unwrap();
        (dates.begin.unwrap(), dates.end)
    }

    #[test]
    fn test_uniform_days_merge_into_one_span() {
        let spans = spans("2021/12/6..8 1:30 -- 12/9 0:30 -- 12/10");
        assert_eq!(spans.len(), 1);
        assert_eq!(dated(&spans[0]), (date(2021, 12, 6), Some(date(2021, 12, 10))));
        assert_eq!(spans[0].amount, Some(Length::minutes(150)));
    }

    #[test]
    fn test_open_range_is_shared_proportionally() {
        let spans = spans("2021/12/6.. 0:35 -- 0:25 -- ..12/13");
        let ranges: Vec<_> = spans.iter().map(dated).collect();
        assert_eq!(
            ranges,
            vec![
                (date(2021, 12, 6), Some(date(2021, 12, 9))),
                (date(2021, 12, 9), Some(date(2021, 12, 11))),
                (date(2021, 12, 11), Some(date(2021, 12, 13))),
            ]
        );
        let amounts: Vec<_> = spans.iter().map(|span| span.amount.unwrap()).collect();
        assert_eq!(
            amounts,
            vec![Length::minutes(35), Length::minutes(25), Length::minutes(25)]
        );
    }

    #[test]
    fn test_exceptions_split_a_daily_range() {
        let spans = spans("2021/12/27..1/8 1:00/day -- not 12/28..29, 1/1");
        let ranges: Vec<_> = spans.iter().map(dated).collect();
        assert_eq!(
            ranges,
            vec![
                (date(2021, 12, 27), Some(date(2021, 12, 27))),
                (date(2021, 12, 30), Some(date(2021, 12, 31))),
                (date(2022, 1, 2), Some(date(2022, 1, 8))),
            ]
        );
        assert_eq!(spans[2].amount, Some(Length::minutes(7 * 60)));
    }

    /// A fixed total is spread before the exception removes days, so the
    /// excluded day's share is lost rather than redistributed.
    #[test]
    fn test_exception_after_fixed_total_drops_its_share() {
        let spans = spans("2021/12/1..4 4:00 -- not 12/2");
        let total = spans
            .iter()
            .fold(Length::minutes(0), |sum, span| {
                sum.plus(span.amount.unwrap(), 35).unwrap()
            });
        assert_eq!(spans.len(), 2);
        assert_eq!(total, Length::minutes(180));
    }

    #[test]
    fn test_missing_leading_date() {
        assert!(matches!(
            run_with("0:30", None, date(2022, 1, 1)),
            Err(ParseError::InvalidHistory(_))
        ));
    }

    #[test]
    fn test_missing_amount() {
        assert_eq!(
            run_with("2021/1/1", None, date(2022, 1, 1)).unwrap_err(),
            ParseError::InvalidHistory(MISSING_AMOUNT.to_string())
        );
    }

    #[test]
    fn test_open_range_until_today_has_open_end() {
        let experiences = run_with("2021/12/6.. 0:10/day", None, date(2021, 12, 10)).unwrap();
        let span = &experiences[0].spans[0];
        assert_eq!(dated(span), (date(2021, 12, 6), None));
        assert_eq!(span.amount, Some(Length::minutes(50)));
    }

    #[test]
    fn test_open_range_in_the_future() {
        assert!(matches!(
            run_with("2022/3/1.. 0:10", None, date(2022, 1, 1)),
            Err(ParseError::InvalidHistory(_))
        ));
    }

    #[test]
    fn test_exception_inside_open_range() {
        assert!(matches!(
            run_with("2021/12/6.. 0:10 -- not 12/7", None, date(2022, 1, 1)),
            Err(ParseError::InvalidHistory(_))
        ));
    }

    #[test]
    fn test_progress_amounts_are_relative() {
        let experiences = run_with(
            "2021/1/1 @50% -- 1/3 @100%",
            Some(Length::pages(300)),
            date(2022, 1, 1),
        )
        .unwrap();
        let spans = &experiences[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].amount, Some(Length::pages(150)));
        assert_eq!(spans[1].amount, Some(Length::pages(150)));
        assert_eq!(spans[1].progress, Some(Progress::Fraction(1.0)));
    }

    #[test]
    fn test_same_day_same_name_overwrites() {
        let spans = spans("2021/1/1 0:30 -- 1/1 0:45");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].amount, Some(Length::minutes(45)));
    }

    #[test]
    fn test_named_sessions_on_one_day_stay_apart() {
        let spans = spans("2021/1/1 0:30 Ep 1 -- 1/1 0:30 ⭐ Ep 2");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].name.as_deref(), Some("Ep 1"));
        assert!(spans[1].favorite);
    }

    #[test]
    fn test_planned_entries_are_undated_and_last() {
        let spans = spans("2021/1/1 1:00 -- ?? 1:00 Episode 2 -- Episode 3");
        assert_eq!(spans.len(), 3);
        assert!(spans[0].dates.is_some());
        assert!(spans[1].dates.is_none());
        assert_eq!(spans[2].name.as_deref(), Some("Episode 3"));
        assert!(spans[2].dates.is_none());
    }

    #[test]
    fn test_groups_are_separate_experiences() {
        let experiences = run_with(
            "2021/1/1 1:00 --- v1 🤝🏼 club 2021/6/1 0:30",
            None,
            date(2022, 1, 1),
        )
        .unwrap();
        assert_eq!(experiences.len(), 2);
        assert_eq!(experiences[1].group.as_deref(), Some("club"));
    }

    #[test]
    fn test_entry_before_previous_start() {
        assert!(matches!(
            run_with("2021/12/30 1:00 -- 2 1:00", None, date(2022, 1, 1)),
            Err(ParseError::InvalidHistory(_))
        ));
        assert!(matches!(
            run_with("2021/12/10.. 1:00 -- 2021/12/5.. 1:00", None, date(2022, 1, 1)),
            Err(ParseError::InvalidHistory(_))
        ));
    }

    #[test]
    fn test_same_start_after_a_range_overwrites() {
        let spans = spans("2021/1/1..3 1:00/day -- 2021/1/1 0:10");
        let ranges: Vec<_> = spans.iter().map(dated).collect();
        assert_eq!(
            ranges,
            vec![
                (date(2021, 1, 1), Some(date(2021, 1, 1))),
                (date(2021, 1, 2), Some(date(2021, 1, 3))),
            ]
        );
        assert_eq!(spans[0].amount, Some(Length::minutes(10)));
    }

    #[test]
    fn test_named_runs_merge_across_days() {
        let spans = spans("2021/1/1..2 0:30/day A -- 2021/1/1..2 0:20/day B");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].name.as_deref(), Some("A"));
        assert_eq!(spans[0].amount, Some(Length::minutes(60)));
        assert_eq!(spans[1].name.as_deref(), Some("B"));
        assert_eq!(spans[1].amount, Some(Length::minutes(40)));
    }

    #[test]
    fn test_repetition_overflow_is_an_error() {
        assert_eq!(
            run_with("2021/1/1 1:00x9223372036854775807", None, date(2022, 1, 1)).unwrap_err(),
            ParseError::InvalidHistory(shared::AMOUNT_TOO_LARGE.to_string())
        );
        assert!(matches!(
            run_with("2021/1/1 1:00x99999999999999999999", None, date(2022, 1, 1)),
            Err(ParseError::Parsing { .. })
        ));
    }

    #[test]
    fn test_weekly_frequency() {
        let spans = spans("2021/3/1..14 1:00/week");
        assert_eq!(spans[0].amount, Some(Length::minutes(120)));
    }
}
