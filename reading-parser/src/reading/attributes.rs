//! Attribute transformers
//!
//! Each module reads a [`ParsedRow`](crate::reading::parsing::fields::ParsedRow)
//! and produces one attribute of an [`Item`](crate::reading::item::Item). Most
//! are plain functions of the row; variants and experiences also need the
//! configuration, and experiences the variants and today's date.

pub mod custom;
pub mod experiences;
pub mod genres;
pub mod head;
pub mod notes;
pub mod rating;
pub mod shared;
pub mod variants;
