//! Sink configuration: the field names and separator the adapter injects.

use super::defaults::{
    DEFAULT_ERROR_FIELD_NAME, DEFAULT_NAME_SEPARATOR, DEFAULT_VERBOSITY_FIELD_NAME,
};

/// Strings the sink adapter uses when shaping records.
///
/// # Example
///
/// ```
/// use tracelogr::config::SinkConfig;
///
/// let config = SinkConfig::default();
/// assert_eq!(config.verbosity_field_name(), "v");
/// assert_eq!(config.error_field_name(), "err");
/// assert_eq!(config.name_separator(), "/");
///
/// let config = SinkConfig::default()
///     .with_error_field_name("error")
///     .with_name_separator(".");
/// assert_eq!(config.error_field_name(), "error");
/// assert_eq!(config.name_separator(), ".");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Key for the verbosity field on info records; empty disables the field
    verbosity_field_name: String,
    /// Key for the error text on error records
    error_field_name: String,
    /// Joins successive name segments
    name_separator: String,
}

impl SinkConfig {
    /// Set the verbosity field key. An empty key suppresses the field.
    pub fn with_verbosity_field_name(mut self, name: impl Into<String>) -> Self {
        self.verbosity_field_name = name.into();
        self
    }

    /// Set the error field key.
    pub fn with_error_field_name(mut self, name: impl Into<String>) -> Self {
        self.error_field_name = name.into();
        self
    }

    /// Set the name segment separator.
    pub fn with_name_separator(mut self, separator: impl Into<String>) -> Self {
        self.name_separator = separator.into();
        self
    }

    /// Apply options in order; later options win.
    pub fn apply_all(mut self, options: impl IntoIterator<Item = SinkOption>) -> Self {
        for option in options {
            option.apply(&mut self);
        }
        self
    }

    pub fn verbosity_field_name(&self) -> &str {
        &self.verbosity_field_name
    }

    pub fn error_field_name(&self) -> &str {
        &self.error_field_name
    }

    pub fn name_separator(&self) -> &str {
        &self.name_separator
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            verbosity_field_name: DEFAULT_VERBOSITY_FIELD_NAME.to_string(),
            error_field_name: DEFAULT_ERROR_FIELD_NAME.to_string(),
            name_separator: DEFAULT_NAME_SEPARATOR.to_string(),
        }
    }
}

/// A single override applied at sink construction.
///
/// Built with [`with_verbosity_field_name`], [`with_error_field_name`] and
/// [`with_name_separator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOption {
    VerbosityFieldName(String),
    ErrorFieldName(String),
    NameSeparator(String),
}

impl SinkOption {
    /// Overwrite the one field this option targets.
    pub fn apply(self, config: &mut SinkConfig) {
        match self {
            SinkOption::VerbosityFieldName(name) => config.verbosity_field_name = name,
            SinkOption::ErrorFieldName(name) => config.error_field_name = name,
            SinkOption::NameSeparator(separator) => config.name_separator = separator,
        }
    }
}

/// Change the verbosity key on info records (default `"v"`). With `""` the
/// verbosity field is left off entirely.
pub fn with_verbosity_field_name(name: impl Into<String>) -> SinkOption {
    SinkOption::VerbosityFieldName(name.into())
}

/// Change the error key on error records (default `"err"`).
pub fn with_error_field_name(name: impl Into<String>) -> SinkOption {
    SinkOption::ErrorFieldName(name.into())
}

/// Change the separator between name segments (default `"/"`).
pub fn with_name_separator(separator: impl Into<String>) -> SinkOption {
    SinkOption::NameSeparator(separator.into())
}
