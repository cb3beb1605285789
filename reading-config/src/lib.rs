//! Shared configuration loader for the reading log toolchain.
//!
//! `defaults/reading.default.toml` is embedded into every binary so that the
//! documented defaults and runtime behavior stay in sync. Applications layer
//! user files and single-key overrides on top via [`Loader`], deserialize into
//! the parser's [`Settings`], and compile those into a [`ReadingConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use reading_parser::reading::config::{Config as ReadingConfig, Settings};
use std::path::Path;
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../defaults/reading.default.toml");

/// Failure to load or validate settings
#[derive(Error, Debug)]
pub enum LoadError {
    /// A file or override could not be read or deserialized.
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    /// The settings deserialized but are not usable.
    #[error(transparent)]
    Invalid(#[from] reading_parser::reading::error::ConfigError),
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for `--set` on the command line).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, LoadError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting settings.
    pub fn build(self) -> Result<Settings, LoadError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }

    /// Build the settings and compile them into a parser configuration.
    pub fn build_config(self) -> Result<ReadingConfig, LoadError> {
        Ok(ReadingConfig::new(self.build()?)?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Settings, LoadError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_settings() {
        let settings = load_defaults().expect("defaults to deserialize");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn supports_overrides() {
        let settings = Loader::new()
            .set_override("pages_per_hour", 50)
            .expect("override to apply")
            .set_override("dnf_string", "ABANDONED")
            .expect("override to apply")
            .build()
            .expect("settings to build");
        assert_eq!(settings.pages_per_hour, 50);
        assert_eq!(settings.dnf_string, "ABANDONED");
    }

    #[test]
    fn rejects_invalid_settings() {
        let result = Loader::new()
            .set_override("pages_per_hour", 0)
            .expect("override to apply")
            .build_config();
        assert!(matches!(result, Err(LoadError::Invalid(_))));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/nonexistent/reading.toml").build();
        assert!(matches!(result, Err(LoadError::Source(_))));
    }
}
