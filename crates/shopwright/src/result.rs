//! Result and error types for shopwright.
//!
//! UI failures (`ElementNotFound`, `PriceMismatch`, ...) are fatal test
//! failures: the scenario that hits one stops immediately. API models never
//! produce them for non-success statuses; only transport errors surface there.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for shopwright operations
pub type ShopResult<T> = Result<T, ShopError>;

/// Errors that can occur while driving a suite
#[derive(Debug, Error)]
pub enum ShopError {
    /// Browser kind is neither chrome nor firefox
    #[error("Browser '{name}' is not supported (expected chrome or firefox)")]
    UnsupportedBrowser {
        /// Requested browser name
        name: String,
    },

    /// Driver install/launch failure
    #[error("Failed to start browser '{browser}': {message}")]
    BrowserLaunch {
        /// Browser kind
        browser: String,
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Element did not appear before the timeout
    #[error("Could not find element {locator} within {timeout_ms}ms")]
    ElementNotFound {
        /// Locator description
        locator: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Element never became displayed and enabled
    #[error("Element {locator} not clickable within {timeout_ms}ms")]
    ElementNotClickable {
        /// Locator description
        locator: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Click/clear/type on a located element failed
    #[error("Interaction '{action}' on {locator} failed: {message}")]
    Interaction {
        /// Action name (click, type, clear)
        action: &'static str,
        /// Locator description
        locator: String,
        /// Error message
        message: String,
    },

    /// Displayed price could not be parsed
    #[error("Cannot parse price from '{input}'")]
    PriceParse {
        /// Raw text read from the page
        input: String,
    },

    /// Displayed total differs from the locally computed total
    #[error("Total price mismatch: expected {expected}, but got {displayed}")]
    PriceMismatch {
        /// Total computed from the cart model
        expected: u64,
        /// Total shown on the page
        displayed: u64,
    },

    /// Cart arithmetic does not fit in a `u64`
    #[error("Cart total overflows at item '{item}'")]
    PriceOverflow {
        /// Item whose subtotal or addition overflowed
        item: String,
    },

    /// Credential row index out of range
    #[error("Row {row} not found in {}", path.display())]
    RowNotFound {
        /// Requested row
        row: usize,
        /// Credential file
        path: PathBuf,
    },

    /// Locator with an empty or unknown strategy/selector
    #[error("Invalid locator '{input}': {message}")]
    InvalidLocator {
        /// Raw locator text
        input: String,
        /// Error message
        message: String,
    },

    /// Text/title/presence assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Screenshot capture or write failed
    #[error("Screenshot '{label}' failed: {message}")]
    Screenshot {
        /// Screenshot label
        label: String,
        /// Error message
        message: String,
    },

    /// Browser driver failure outside of element interactions
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// HTTP transport failure
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Test-data file missing or incomplete
    #[error("Test data error: {message}")]
    TestData {
        /// Error message
        message: String,
    },

    /// Suite configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Fixture setup/teardown failed
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ShopError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a test-data error
    #[must_use]
    pub fn test_data(message: impl Into<String>) -> Self {
        Self::TestData {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a fixture error
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }

    /// Whether this error is a UI test failure (timeout, mismatch or
    /// interaction) rather than an infrastructure error.
    #[must_use]
    pub const fn is_test_failure(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::ElementNotClickable { .. }
                | Self::Interaction { .. }
                | Self::PriceParse { .. }
                | Self::PriceMismatch { .. }
                | Self::PriceOverflow { .. }
                | Self::AssertionFailed { .. }
        )
    }
}
