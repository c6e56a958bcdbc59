//! Error types for TagRelay.

use thiserror::Error;

/// Common error type for TagRelay.
#[derive(Error, Debug)]
pub enum TagRelayError {
    /// Store error.
    ///
    /// This is a generic document store error that wraps read/write
    /// failures from any store backend.
    #[error("store error: {0}")]
    Store(String),

    /// Malformed subscription record (e.g., unreadable policy fields).
    #[error("malformed subscription: {0}")]
    Subscription(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error for store documents.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport error outside the per-message outcome classification.
    #[error("transport error: {0}")]
    Transport(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for TagRelay operations.
pub type Result<T> = std::result::Result<T, TagRelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = TagRelayError::Store("document file locked".to_string());
        assert_eq!(err.to_string(), "store error: document file locked");
    }

    #[test]
    fn test_subscription_error_display() {
        let err = TagRelayError::Subscription("policy field is not an object".to_string());
        assert_eq!(
            err.to_string(),
            "malformed subscription: policy field is not an object"
        );
    }

    #[test]
    fn test_not_found_error_display() {
        let err = TagRelayError::NotFound("item".to_string());
        assert_eq!(err.to_string(), "item not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TagRelayError = io_err.into();
        assert!(matches!(err, TagRelayError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(TagRelayError::Config("missing token".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
