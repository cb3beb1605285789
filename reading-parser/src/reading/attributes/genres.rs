//! Genres come from the genres column, or from the label of a compact row.

use crate::reading::parsing::fields::ParsedRow;
use crate::reading::rows::columns::Column;

pub fn genres(row: &ParsedRow) -> Vec<String> {
    if row.is_compact() {
        return row
            .head_prefix()
            .map(|prefix| {
                prefix
                    .present("genres")
                    .into_iter()
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default();
    }

    row.segments(&Column::Genres)
        .iter()
        .flat_map(|fields| fields.present("genres"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::config::Config;
    use crate::reading::parsing::segments::parse_row;
    use crate::reading::rows::classification::{classify, RowKind};
    use crate::reading::rows::splitting::split_columns;

    fn parsed(line: &str) -> ParsedRow {
        let config = Config::default();
        let kind = classify(line, &config);
        let columns = split_columns(line, kind, &config).unwrap();
        parse_row(kind, columns, &config).unwrap()
    }

    #[test]
    fn test_genre_column_is_a_trimmed_list() {
        let row = parsed("|Sapiens|||| history ,science,, |");
        assert_eq!(row.kind, RowKind::Regular);
        assert_eq!(genres(&row), vec!["history", "science"]);
    }

    #[test]
    fn test_compact_label_is_lowercased() {
        let row = parsed("\\HISTORICAL FICTION, CLASSICS: 📕True Grit");
        assert_eq!(genres(&row), vec!["historical fiction", "classics"]);
    }
}
