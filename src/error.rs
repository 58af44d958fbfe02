//! Error types for the associa service.

use associa_search::SearchError;

/// Top-level error type for the search service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server error (bind, serve).
    #[error("server error: {0}")]
    Server(String),

    /// Error from the search core.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_display_unchanged() {
        let err: AppError = SearchError::Config("poll_interval_ms must be greater than 0".into()).into();
        assert_eq!(
            err.to_string(),
            "config error: poll_interval_ms must be greater than 0"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
