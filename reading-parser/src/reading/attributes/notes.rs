use crate::reading::item::Note;
use crate::reading::parsing::fields::ParsedRow;
use crate::reading::rows::columns::Column;

/// One note per segment, with its leading markers recorded as flags.
pub fn notes(row: &ParsedRow) -> Vec<Note> {
    row.segments(&Column::Notes)
        .iter()
        .filter_map(|fields| {
            Some(Note {
                blurb: fields.has("blurb"),
                private: fields.has("private"),
                content: fields.text("content")?.to_string(),
            })
        })
        .collect()
}
