//! Error types for configuration composition.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ComposeError>;

#[derive(Debug, Error)]
pub enum ComposeError {
    /// A base/overlay fragment did not survive the merge round-trip.
    #[error("invalid overlay fragment: {0}")]
    InvalidOverlay(String),

    #[error(transparent)]
    Config(#[from] polypage_config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
