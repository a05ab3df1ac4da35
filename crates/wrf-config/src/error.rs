//! Error types for the configuration engine.

use thiserror::Error;

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while resolving, merging or generating configuration.
///
/// Structural problems with a nested grid layout are not errors; they are
/// collected by [`crate::ConfigurationChecker`] instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    // === Resolution Errors ===
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid key path: '{0}'")]
    InvalidPath(String),

    #[error("Cannot create '{0}': an intermediate node is not a table")]
    NotATable(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid date in '{0}'")]
    InvalidDate(String),

    // === Structure Errors ===
    #[error("Domain '{domain}' references unknown parent '{parent}'")]
    UnknownParent { domain: String, parent: String },

    #[error("Domain '{0}' is part of a parent cycle")]
    ParentCycle(String),

    #[error("Cannot merge {update} into {base} at '{path}'")]
    TypeMismatch {
        path: String,
        base: &'static str,
        update: &'static str,
    },

    // === Generation Errors ===
    #[error("Unsupported map projection: {0}")]
    UnsupportedProjection(String),

    #[error("Unknown namelist section: {0}")]
    UnknownSection(String),

    // === Document Errors ===
    #[error("Failed to decode configuration document: {0}")]
    Document(String),
}

impl ConfigError {
    /// True when the error only means "nothing is stored at this path".
    ///
    /// Tag gathering may swallow these; every other error is always raised.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, ConfigError::KeyNotFound(_))
    }

    pub(crate) fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Document(format!("YAML error: {}", err))
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Document(format!("JSON error: {}", err))
    }
}
