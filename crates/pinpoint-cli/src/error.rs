//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Input document could not be read
    #[error("Cannot read {}: {source}", path.display())]
    InputFile {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Target expression selected nothing
    #[error("Target not found: {target}")]
    TargetNotFound {
        /// The CSS or XPath expression
        target: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Refinement endpoint failure
    #[error("Refinement failed: {message}")]
    Refinement {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pinpoint library error
    #[error("Pinpoint error: {0}")]
    Locator(#[from] pinpoint::LocatorError),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML output error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl CliError {
    /// Create an input file error
    #[must_use]
    pub fn input_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::InputFile {
            path: path.into(),
            source,
        }
    }

    /// Create a target-not-found error
    #[must_use]
    pub fn target_not_found(target: impl Into<String>) -> Self {
        Self::TargetNotFound {
            target: target.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
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
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_input_file_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = CliError::input_file("page.html", io_err);
        assert!(err.to_string().contains("page.html"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_target_not_found_error() {
        let err = CliError::target_not_found("#nope");
        assert!(err.to_string().contains("Target not found"));
        assert!(err.to_string().contains("#nope"));
    }

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("bad arg");
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[test]
    fn test_refinement_error() {
        let err = CliError::refinement("no endpoint");
        assert!(err.to_string().contains("Refinement"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
    }

    #[test]
    fn test_locator_error_from() {
        let err: CliError = pinpoint::LocatorError::config("max_css_length must be at least 1").into();
        assert!(err.to_string().contains("Pinpoint error"));
        assert!(err.to_string().contains("max_css_length"));
    }
}
