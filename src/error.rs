//! Error types for Yatube.

use thiserror::Error;

/// Common error type for Yatube.
#[derive(Error, Debug)]
pub enum YatubeError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (token issuing or decoding).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for input that is not a form submission.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for YatubeError {
    fn from(e: sqlx::Error) -> Self {
        YatubeError::Database(e.to_string())
    }
}

/// Result type alias for Yatube operations.
pub type Result<T> = std::result::Result<T, YatubeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_display() {
        let err = YatubeError::NotFound("group".to_string());
        assert_eq!(err.to_string(), "group not found");
    }

    #[test]
    fn test_validation_error_display() {
        let err = YatubeError::Validation("config parse error".to_string());
        assert_eq!(err.to_string(), "validation error: config parse error");
    }

    #[test]
    fn test_auth_error_display() {
        let err = YatubeError::Auth("bad signature".to_string());
        assert_eq!(err.to_string(), "authentication error: bad signature");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "media root missing");
        let err: YatubeError = io_err.into();
        assert!(matches!(err, YatubeError::Io(_)));
        assert!(err.to_string().contains("media root missing"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: YatubeError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, YatubeError::Database(_)));
    }
}
