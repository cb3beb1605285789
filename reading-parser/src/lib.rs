//! # reading
//!
//! A parser for pipe-delimited reading logs.
//!
//! Each row of a log is classified, split into columns, parsed segment by
//! segment against ordered candidate patterns, and assembled into one or more
//! [`Item`](reading::item::Item) records. The history column carries the
//! algorithmic core: its entries are folded into dated reading spans with exact
//! amount arithmetic.
//!
//! Layout
//!
//!     src/reading
//!       ├── rows          classification and column splitting
//!       ├── parsing       grammar and segment parser
//!       ├── attributes    per-attribute transformers, experiences and history
//!       ├── assembling    items of a parsed row
//!       ├── transforms    the composable row pipeline
//!       └── loader        whole-log parsing with an error policy
//!
//! For test helpers see the [testing module](reading::testing).

pub mod reading;
