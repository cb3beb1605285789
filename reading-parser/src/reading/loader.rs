//! Log loading
//!
//! [`LogParser`] runs the row pipeline over every line of a log. Rows are
//! independent: a failing row never affects the others, and the caller decides
//! through [`ErrorPolicy`] whether the first failure aborts the parse.
//!
//! ```rust,ignore
//! use reading_parser::reading::loader::{ErrorPolicy, LogParser};
//!
//! let parser = LogParser::new(config, today);
//! let outcome = parser.parse_str(&text, ErrorPolicy::Skip)?;
//! for error in &outcome.errors {
//!     eprintln!("{}", error);
//! }
//! ```

use crate::reading::config::Config;
use crate::reading::error::{LineError, ParseResult};
use crate::reading::item::Item;
use crate::reading::rows::classification::RowKind;
use crate::reading::transforms::standard::{to_items, ItemTransform, DEFAULT_CONFIG};
use crate::reading::transforms::Runnable;
use crate::reading::transforms::stages::{Classify, ClassifiedRow};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// What to do with a row that fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failing row.
    #[default]
    Abort,
    /// Log the failure, keep it in [`ParseOutcome::errors`] and go on.
    Skip,
}

/// Items of every successfully parsed row, in log order, plus skipped failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub items: Vec<Item>,
    pub errors: Vec<LineError>,
}

/// Error that can occur when loading a log file
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Line(#[from] LineError),
}

/// Parses log text with one configuration and one notion of today
pub struct LogParser {
    config: Arc<Config>,
    classify: Classify,
    pipeline: ItemTransform,
}

impl LogParser {
    pub fn new(config: Arc<Config>, today: NaiveDate) -> Self {
        Self {
            classify: Classify::new(config.clone()),
            pipeline: to_items(config.clone(), today),
            config,
        }
    }

    /// A parser over the default configuration.
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self::new(DEFAULT_CONFIG.clone(), today)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Items of a single row.
    pub fn parse_line(&self, line: &str) -> ParseResult<Vec<Item>> {
        self.pipeline.run(line.to_string())
    }

    pub fn parse_str(&self, text: &str, policy: ErrorPolicy) -> Result<ParseOutcome, LineError> {
        let mut outcome = ParseOutcome::default();
        let mut rows = 0;

        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            let ClassifiedRow { kind, .. } =
                self.classify
                    .run(line.to_string())
                    .map_err(|error| LineError {
                        line_number,
                        line: line.to_string(),
                        error,
                    })?;
            debug!(line_number, ?kind, "classified row");
            match kind {
                RowKind::Blank | RowKind::Comment => continue,
                RowKind::CustomConfigDirective => {
                    warn!(line_number, "ignoring config directive");
                    continue;
                }
                RowKind::Regular | RowKind::CompactPlanned => {}
            }

            rows += 1;
            match self.parse_line(line) {
                Ok(items) => outcome.items.extend(items),
                Err(error) => {
                    let error = LineError {
                        line_number,
                        line: line.to_string(),
                        error,
                    };
                    match policy {
                        ErrorPolicy::Abort => return Err(error),
                        ErrorPolicy::Skip => {
                            warn!(line_number, error = %error.error, "skipping row");
                            outcome.errors.push(error);
                        }
                    }
                }
            }
        }

        info!(
            rows,
            items = outcome.items.len(),
            skipped = outcome.errors.len(),
            "parsed reading log"
        );
        Ok(outcome)
    }

    pub fn parse_path(&self, path: &Path, policy: ErrorPolicy) -> Result<ParseOutcome, LoaderError> {
        let text = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(self.parse_str(&text, policy)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::error::ParseError;

    fn parser() -> LogParser {
        LogParser::with_defaults(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap())
    }

    const LOG: &str = "\\------ FICTION\n\
                       |📕Goatsong\n\
                       \n\
                       |📕 \n\
                       \\config: pages_per_hour 40\n\
                       |🔊Sapiens\n";

    #[test]
    fn test_abort_stops_at_first_failure() {
        let error = parser().parse_str(LOG, ErrorPolicy::Abort).unwrap_err();
        assert_eq!(error.line_number, 4);
        assert!(matches!(error.error, ParseError::InvalidHead(_)));
    }

    #[test]
    fn test_skip_collects_failures() {
        let outcome = parser().parse_str(LOG, ErrorPolicy::Skip).unwrap();
        let titles: Vec<_> = outcome.items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Goatsong", "Sapiens"]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].line_number, 4);
    }

    #[test]
    fn test_missing_file() {
        let result = parser().parse_path(Path::new("/nonexistent/log.csv"), ErrorPolicy::Abort);
        assert!(matches!(result, Err(LoaderError::Io { .. })));
    }
}
