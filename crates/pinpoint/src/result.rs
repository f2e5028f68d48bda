//! Result and error types for Pinpoint.

use thiserror::Error;

/// Result type for Pinpoint operations
pub type LocatorResult<T> = Result<T, LocatorError>;

/// Errors that can occur in Pinpoint
///
/// Synthesis and ranking never surface these to their callers: a failing
/// expression degrades to a null candidate or a zero-match score. They are
/// returned by the lower-level document, configuration and refinement APIs.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// CSS selector failed to parse
    #[error("Invalid CSS selector {selector:?}: {message}")]
    InvalidSelector {
        /// The offending selector
        selector: String,
        /// Parser message
        message: String,
    },

    /// XPath expression failed to parse or evaluate
    #[error("Invalid XPath {expression:?} at offset {offset}: {message}")]
    InvalidXPath {
        /// The offending expression
        expression: String,
        /// Byte offset of the failure
        offset: usize,
        /// Parser message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Refinement payload or response error
    #[error("Refinement failed: {message}")]
    Refinement {
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
}

impl LocatorError {
    /// Create an invalid selector error
    #[must_use]
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Create an invalid XPath error
    #[must_use]
    pub fn invalid_xpath(
        expression: impl Into<String>,
        offset: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidXPath {
            expression: expression.into(),
            offset,
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

    /// Create a refinement error
    #[must_use]
    pub fn refinement(message: impl Into<String>) -> Self {
        Self::Refinement {
            message: message.into(),
        }
    }

    /// Whether this error came from evaluating a locator expression
    #[must_use]
    pub const fn is_evaluation_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidSelector { .. } | Self::InvalidXPath { .. }
        )
    }
}
