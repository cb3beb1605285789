//! Parsing
//!
//!     Column text to named fields. The [grammar](grammar) module holds the
//!     ordered candidate tables, compiled once per configuration. The
//!     [segments](segments) module walks a column's text through them and
//!     produces the intermediate [fields](fields) structures that the attribute
//!     transformers consume.
//!
//!     The intermediate shape stays column-oriented on purpose: a head column
//!     with two format markers is two blocks, a history column is a list of
//!     groups of entries. Turning that into item attributes is a separate step.

pub mod fields;
pub mod grammar;
pub mod segments;

pub use fields::{Fields, ParsedColumn, ParsedRow, Value};
pub use grammar::{Candidate, Grammar};
pub use segments::{parse_column, parse_row};
