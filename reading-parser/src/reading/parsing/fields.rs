//! Intermediate parse structures
//!
//! The contract between the segment parser and the attribute transformers. A
//! [`ParsedRow`] keeps the row's column-oriented shape: column → parsed
//! structure, where each structure is built from [`Fields`] (named captures).

use crate::reading::rows::classification::RowKind;
use crate::reading::rows::columns::Column;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Field holding the raw text of a flattened block.
pub const SEGMENT: &str = "segment";

/// A captured value: plain text, or an array-valued field whose elements keep
/// their position even when blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    List(Vec<Option<String>>),
}

impl Value {
    /// Coerce into a list, wrapping a text value as its single element.
    pub fn into_list(self) -> Value {
        match self {
            Value::Text(text) => Value::List(vec![Some(text)]),
            list => list,
        }
    }
}

/// Named captures of one segment (or one flattened block).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// A text field. Array-valued fields yield their first present element.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name)? {
            Value::Text(text) => Some(text),
            Value::List(items) => items.iter().flatten().next().map(String::as_str),
        }
    }

    /// An array-valued field, blank elements included. Text fields yield one
    /// element; missing fields yield none.
    pub fn list(&self, name: &str) -> Vec<Option<&str>> {
        match self.0.get(name) {
            Some(Value::List(items)) => items.iter().map(|item| item.as_deref()).collect(),
            Some(Value::Text(text)) => vec![Some(text.as_str())],
            None => Vec::new(),
        }
    }

    /// Present elements of an array-valued field.
    pub fn present(&self, name: &str) -> Vec<&str> {
        self.list(name).into_iter().flatten().collect()
    }

    /// Merge a later segment into this one: lists concatenate in segment
    /// order, the first text value wins.
    pub fn merge(&mut self, other: Fields) {
        for (name, value) in other.0 {
            match self.0.entry(name) {
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
                Entry::Occupied(mut entry) => match (entry.get_mut(), value) {
                    (Value::List(existing), Value::List(more)) => existing.extend(more),
                    (Value::List(existing), Value::Text(text)) => existing.push(Some(text)),
                    (Value::Text(_), _) => {}
                },
            }
        }
    }
}

/// The parsed form of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedColumn {
    /// Format-delimited blocks, each flattened into one set of fields. Blocks
    /// that follow a format marker carry a `format` field.
    Blocks {
        prefix: Option<Fields>,
        blocks: Vec<Fields>,
    },
    /// One set of fields per segment.
    Segments(Vec<Fields>),
    /// Segment groups (experience groups of the history column).
    Groups(Vec<Vec<Fields>>),
}

/// One row, parsed column by column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub kind: RowKind,
    pub columns: BTreeMap<Column, ParsedColumn>,
}

impl ParsedRow {
    pub fn new(kind: RowKind) -> Self {
        Self {
            kind,
            columns: BTreeMap::new(),
        }
    }

    pub fn column(&self, column: &Column) -> Option<&ParsedColumn> {
        self.columns.get(column)
    }

    pub fn has(&self, column: &Column) -> bool {
        self.columns.contains_key(column)
    }

    /// The head column, regular or compact.
    fn head(&self) -> Option<&ParsedColumn> {
        self.column(&Column::Head)
            .or_else(|| self.column(&Column::CompactHead))
    }

    pub fn head_blocks(&self) -> &[Fields] {
        match self.head() {
            Some(ParsedColumn::Blocks { blocks, .. }) => blocks,
            _ => &[],
        }
    }

    pub fn head_prefix(&self) -> Option<&Fields> {
        match self.head() {
            Some(ParsedColumn::Blocks { prefix, .. }) => prefix.as_ref(),
            _ => None,
        }
    }

    pub fn blocks(&self, column: &Column) -> &[Fields] {
        match self.column(column) {
            Some(ParsedColumn::Blocks { blocks, .. }) => blocks,
            _ => &[],
        }
    }

    pub fn segments(&self, column: &Column) -> &[Fields] {
        match self.column(column) {
            Some(ParsedColumn::Segments(segments)) => segments,
            _ => &[],
        }
    }

    pub fn groups(&self, column: &Column) -> &[Vec<Fields>] {
        match self.column(column) {
            Some(ParsedColumn::Groups(groups)) => groups,
            _ => &[],
        }
    }

    /// First segment of a single-segment column.
    pub fn first(&self, column: &Column) -> Option<&Fields> {
        self.segments(column).first()
    }

    pub fn is_compact(&self) -> bool {
        self.kind == RowKind::CompactPlanned
    }
}
