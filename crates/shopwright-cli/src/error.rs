//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// A suite ran and at least one step failed
    #[error("{suite} failed: {message}")]
    SuiteFailed {
        /// Suite name
        suite: String,
        /// First failure
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Shopwright library error
    #[error("{0}")]
    Shop(#[from] shopwright::ShopError),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a suite failure
    #[must_use]
    pub fn suite_failed(suite: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SuiteFailed {
            suite: suite.into(),
            message: message.into(),
        }
    }
}
