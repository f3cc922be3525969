//! Error handling module for the `rill` CLI host.
//!
//! This module provides the host-process error type, distinct from
//! `rill_eval::RuntimeError` (a language-level runtime error, formatted and
//! printed rather than propagated as a Rust error past the point of use).

use thiserror::Error;

/// Main error type for the `rill` CLI host.
#[derive(Error, Debug)]
pub enum RillError {
    /// Error when a required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when file operations fail.
    #[error("File operation failed: {0}")]
    FileOperation(String),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A script failed to lex, parse, or evaluate. The payload is already
    /// formatted for display and should be printed to stderr as-is, with no
    /// further wrapping.
    #[error("{0}")]
    Script(String),
}

/// Result type alias using `RillError`.
pub type Result<T> = std::result::Result<T, RillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = RillError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_file_operation_error_display() {
        let err = RillError::FileOperation("permission denied".to_string());
        assert_eq!(err.to_string(), "File operation failed: permission denied");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let rill_err: RillError = io_err.into();
        assert!(matches!(rill_err, RillError::Io(_)));
    }

    #[test]
    fn test_script_error_display_is_verbatim() {
        let err = RillError::Script("Runtime: Division by zero".to_string());
        assert_eq!(err.to_string(), "Runtime: Division by zero");
    }
}
