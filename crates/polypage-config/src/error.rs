//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("invalid config value for `{field}`")]
    InvalidValue {
        field: String,
        hint: Option<String>,
    },

    // Schema validation errors (no filesystem checks)
    #[error("entry `{name}` has an empty path sequence")]
    EmptyEntrySequence { name: String },

    #[error("entry name cannot be empty")]
    EmptyEntryName,

    #[error("schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    // Filesystem validation errors (for CLI use)
    #[error("template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    #[error("lint config directory not found: {path}")]
    LintConfigNotFound { path: PathBuf },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
