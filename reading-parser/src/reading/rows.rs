//! Rows
//!
//!     A row is one line of the log. Before any grammar runs, the row is
//!     classified (blank, comment, compact planned list, regular data row or a
//!     config directive) and, when it carries items, cut into logical columns.
//!
//!     1. Classification. See [classification](classification). Never fails.
//!     2. Splitting. See [splitting](splitting). Regular rows are split on the
//!        column separator and zipped against the enabled columns; more pieces
//!        than columns is an error, missing trailing columns are simply absent.
//!
//!     The [columns](columns) module describes each logical column: how the
//!     segment parser cuts its text and which grammar applies to each segment.

pub mod classification;
pub mod columns;
pub mod splitting;

pub use classification::{classify, RowKind};
pub use columns::Column;
pub use splitting::split_columns;
