//! Error types for the Hypothesizer plugin.
//!
//! This module defines the centralized error type [`HypothesizerError`] and a type
//! alias [`Result`] used throughout the plugin. None of these errors are fatal to
//! the view: the application layer maps service failures to fixed user-facing
//! messages and logs the technical detail through `tracing`.

use thiserror::Error;

/// The main error type for Hypothesizer operations.
///
/// # Examples
///
/// ```
/// use hypothesizer::HypothesizerError;
///
/// let err = HypothesizerError::Service { status: 502, message: "bad gateway".to_string() };
/// assert_eq!(err.to_string(), "Service error (status 502): bad gateway");
/// ```
#[derive(Debug, Error)]
pub enum HypothesizerError {
    /// The remote research service answered with a non-success status, or the
    /// host failed to deliver the request at all.
    #[error("Service error (status {status}): {message}")]
    Service {
        /// HTTP status reported by the host (`0` when no response was received).
        status: u16,
        /// Body or transport error text, kept for logging only.
        message: String,
    },

    /// A service response could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Automatically converts from `std::io::Error`, mostly raised while the
    /// worker writes exported documents.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for HypothesizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A specialized `Result` type for Hypothesizer operations.
pub type Result<T> = std::result::Result<T, HypothesizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_decode_errors() {
        let err: HypothesizerError = serde_json::from_str::<Vec<u8>>("{")
            .map_err(HypothesizerError::from)
            .unwrap_err();
        assert!(matches!(err, HypothesizerError::Decode(_)));
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn open_missing() -> Result<()> {
            std::fs::read("/definitely/not/here/hypothesizer")?;
            Ok(())
        }
        assert!(matches!(open_missing(), Err(HypothesizerError::Io(_))));
    }
}
