//! Experiences of one item
//!
//! Two strategies build them: the history column when it is present, else the
//! start and end date columns together with the head's progress. Compact
//! planned rows have none. Whatever a strategy builds is then validated.

pub mod dates_and_head;
pub mod history;
pub mod validator;

use crate::reading::config::Config;
use crate::reading::error::ParseResult;
use crate::reading::item::{Experience, Variant};
use crate::reading::parsing::fields::ParsedRow;
use crate::reading::rows::columns::Column;
use chrono::NaiveDate;
use validator::Scope;

pub fn experiences(
    row: &ParsedRow,
    index: usize,
    variants: &[Variant],
    config: &Config,
    today: NaiveDate,
) -> ParseResult<Vec<Experience>> {
    if row.is_compact() {
        return Ok(Vec::new());
    }

    let (experiences, scope) = if row.has(&Column::History) {
        (
            history::experiences(row, variants, config, today)?,
            Scope {
                starts: true,
                ends: true,
            },
        )
    } else {
        (
            dates_and_head::experiences(row, index, variants)?,
            Scope {
                starts: row.has(&Column::StartDates),
                ends: row.has(&Column::EndDates),
            },
        )
    };

    validator::validate(&experiences, scope, today)?;
    Ok(experiences)
}
