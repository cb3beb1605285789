//! Configuration consumed by the row pipeline
//!
//! [`Settings`] is the plain, deserializable form (what `reading-config` layers
//! from TOML files). [`Config::new`] validates it once and compiles it into the
//! immutable [`Config`]: the enabled column layout, the format symbol table and
//! every grammar pattern. A `Config` is shared read-only across all rows.

use crate::reading::error::ConfigError;
use crate::reading::item::Format;
use crate::reading::parsing::grammar::Grammar;
use crate::reading::rows::columns::Column;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marker symbols used inside columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    pub blurb: String,
    pub private: String,
    pub favorite: String,
    pub group: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            blurb: "💬".to_string(),
            private: "🔒".to_string(),
            favorite: "⭐".to_string(),
            group: "🤝🏼".to_string(),
        }
    }
}

/// Source name used for a URL-only source on a given domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlName {
    pub domain: String,
    pub name: String,
}

impl UrlName {
    fn new(domain: &str, name: &str) -> Self {
        Self {
            domain: domain.to_string(),
            name: name.to_string(),
        }
    }
}

/// Raw settings, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub comment_character: String,
    pub column_separator: String,
    pub list_separator: String,
    pub long_separator: String,
    pub short_separator: String,
    pub group_separator: String,
    pub dnf_string: String,
    pub planned_marker: String,
    pub pages_per_hour: u32,
    pub enabled_columns: Vec<String>,
    pub formats: BTreeMap<Format, String>,
    pub markers: Markers,
    pub url_names: Vec<UrlName>,
    pub custom_numeric_columns: BTreeMap<String, f64>,
    pub custom_text_columns: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        let formats = [
            (Format::Print, "📕"),
            (Format::Ebook, "⚡"),
            (Format::Audiobook, "🔊"),
            (Format::Pdf, "📄"),
            (Format::Audio, "🎤"),
            (Format::Website, "🌐"),
        ]
        .into_iter()
        .map(|(format, symbol)| (format, symbol.to_string()))
        .collect();

        Self {
            comment_character: "\\".to_string(),
            column_separator: "|".to_string(),
            list_separator: ",".to_string(),
            long_separator: "--".to_string(),
            short_separator: "-".to_string(),
            group_separator: "---".to_string(),
            dnf_string: "DNF".to_string(),
            planned_marker: "??".to_string(),
            pages_per_hour: 35,
            enabled_columns: Column::STANDARD
                .iter()
                .map(|column| column.name().to_string())
                .collect(),
            formats,
            markers: Markers::default(),
            url_names: vec![
                UrlName::new("youtube.com", "YouTube"),
                UrlName::new("archive.org", "Internet Archive"),
                UrlName::new("gutenberg.org", "Project Gutenberg"),
                UrlName::new("hoopladigital.com", "Hoopla"),
                UrlName::new("overdrive.com", "Libby"),
            ],
            custom_numeric_columns: BTreeMap::new(),
            custom_text_columns: BTreeMap::new(),
        }
    }
}

/// Validated, compiled configuration
#[derive(Debug, Clone)]
pub struct Config {
    settings: Settings,
    columns: Vec<Column>,
    grammar: Grammar,
}

impl Config {
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let required = [
            ("comment_character", &settings.comment_character),
            ("column_separator", &settings.column_separator),
            ("list_separator", &settings.list_separator),
            ("long_separator", &settings.long_separator),
            ("short_separator", &settings.short_separator),
            ("group_separator", &settings.group_separator),
            ("dnf_string", &settings.dnf_string),
            ("planned_marker", &settings.planned_marker),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::EmptySetting(name));
        }
        if settings.formats.is_empty() || settings.formats.values().any(|symbol| symbol.is_empty()) {
            return Err(ConfigError::EmptySetting("formats"));
        }
        if settings.pages_per_hour == 0 {
            return Err(ConfigError::InvalidPagesPerHour);
        }

        let columns = Self::resolve_columns(&settings)?;
        let grammar = Grammar::compile(&settings)?;

        Ok(Self {
            settings,
            columns,
            grammar,
        })
    }

    fn resolve_columns(settings: &Settings) -> Result<Vec<Column>, ConfigError> {
        let mut columns: Vec<Column> = Vec::new();
        for name in &settings.enabled_columns {
            let column = if let Some(standard) = Column::from_standard_name(name) {
                standard
            } else if settings.custom_numeric_columns.contains_key(name) {
                Column::CustomNumeric(name.clone())
            } else if settings.custom_text_columns.contains_key(name) {
                Column::CustomText(name.clone())
            } else {
                return Err(ConfigError::UnknownColumn(name.clone()));
            };
            if columns.contains(&column) {
                return Err(ConfigError::DuplicateColumn(name.clone()));
            }
            columns.push(column);
        }
        if !columns.contains(&Column::Head) {
            return Err(ConfigError::MissingHeadColumn);
        }
        Ok(columns)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Enabled columns, in row order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_column(&self, column: &Column) -> bool {
        self.columns.contains(column)
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn pages_per_hour(&self) -> u32 {
        self.settings.pages_per_hour
    }

    pub fn format_for_symbol(&self, symbol: &str) -> Option<Format> {
        self.settings
            .formats
            .iter()
            .find(|(_, candidate)| candidate.as_str() == symbol)
            .map(|(format, _)| *format)
    }

    /// Name configured for a URL's domain (exact domain or any subdomain of it).
    pub fn name_for_url(&self, url: &str) -> Option<String> {
        let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        let host = without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .trim_start_matches("www.");
        self.settings
            .url_names
            .iter()
            .find(|entry| host == entry.domain || host.ends_with(&format!(".{}", entry.domain)))
            .map(|entry| entry.name.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(Settings::default()).unwrap_or_else(|e| {
            unreachable!("default settings are valid: {}", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns() {
        let config = Config::default();
        assert_eq!(config.columns().len(), 9);
        assert_eq!(config.columns()[1], Column::Head);
    }

    #[test]
    fn test_head_column_is_required() {
        let settings = Settings {
            enabled_columns: vec!["rating".to_string()],
            ..Settings::default()
        };
        assert_eq!(
            Config::new(settings).unwrap_err(),
            ConfigError::MissingHeadColumn
        );
    }

    #[test]
    fn test_unknown_and_duplicate_columns() {
        let unknown = Settings {
            enabled_columns: vec!["head".to_string(), "mood".to_string()],
            ..Settings::default()
        };
        assert_eq!(
            Config::new(unknown).unwrap_err(),
            ConfigError::UnknownColumn("mood".to_string())
        );

        let duplicate = Settings {
            enabled_columns: vec!["head".to_string(), "head".to_string()],
            ..Settings::default()
        };
        assert_eq!(
            Config::new(duplicate).unwrap_err(),
            ConfigError::DuplicateColumn("head".to_string())
        );
    }

    #[test]
    fn test_custom_columns_resolve() {
        let mut settings = Settings::default();
        settings
            .custom_numeric_columns
            .insert("surprise".to_string(), 0.0);
        settings.enabled_columns.push("surprise".to_string());
        let config = Config::new(settings).unwrap();
        assert!(config.has_column(&Column::CustomNumeric("surprise".to_string())));
    }

    #[test]
    fn test_name_for_url() {
        let config = Config::default();
        assert_eq!(
            config.name_for_url("https://www.youtube.com/watch?v=1"),
            Some("YouTube".to_string())
        );
        assert_eq!(
            config.name_for_url("https://libbyapp.overdrive.com/x"),
            Some("Libby".to_string())
        );
        assert_eq!(config.name_for_url("https://example.com"), None);
    }

    #[test]
    fn test_format_for_symbol() {
        let config = Config::default();
        assert_eq!(config.format_for_symbol("🔊"), Some(Format::Audiobook));
        assert_eq!(config.format_for_symbol("x"), None);
    }
}
