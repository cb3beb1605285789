//! Statistics over reading log items
//!
//! A query names one operation, any number of filters and an optional
//! grouping:
//!
//! ```text
//! count status=done format=audiobook by year
//! top-rating 5 genre=history
//! average-length author~holt
//! ```
//!
//! [`run`] parses and evaluates a query in one step; [`query::Query::parse`] and
//! [`evaluate::evaluate`] are available separately for reuse of a parsed query.

pub mod error;
pub mod evaluate;
pub mod query;

pub use error::QueryError;
pub use evaluate::{Ranked, StatsOutput, Value};
pub use query::Query;

use reading_parser::reading::item::Item;
use tracing::debug;

pub fn run(text: &str, items: &[Item], pages_per_hour: u32) -> Result<StatsOutput, QueryError> {
    let query = Query::parse(text)?;
    debug!(?query, items = items.len(), "evaluating stats query");
    Ok(evaluate::evaluate(&query, items, pages_per_hour))
}
