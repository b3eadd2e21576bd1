//! Error types for Playlint.
//!
//! Linting itself reports [`LintError`](crate::lint::LintError); this module
//! covers the failures around a lint run, such as loading the configuration
//! file.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Playlint operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Playlint.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Configuration file could not be read or parsed.
    #[error("Invalid configuration in '{path}': {message}")]
    Config {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}
