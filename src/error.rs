//! Unified error handling.
//!
//! All fallible operations in this crate return [`Result`]. Failures are
//! terminal for the triggering action: there is no retry policy anywhere.

use thiserror::Error;

use crate::config::ConfigError;

/// Error type for theme runtime operations.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Cart endpoint returned a non-success status.
    #[error("Cart endpoint returned {0}")]
    Status(reqwest::StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Preference store I/O failed.
    #[error("Preference store error: {0}")]
    Store(#[from] std::io::Error),

    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for [`ThemeError`].
pub type Result<T> = std::result::Result<T, ThemeError>;
