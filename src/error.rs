//! Error types for the jobmatch application.

use jobmatch_rank::RankError;

/// Top-level error type for the jobmatch application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// HTTP client construction or transport error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the ranking pipeline.
    #[error(transparent)]
    Rank(#[from] RankError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings() {
        assert_eq!(
            AppError::Config("missing api key".into()).to_string(),
            "config error: missing api key"
        );
        assert_eq!(
            AppError::Http("timeout".into()).to_string(),
            "HTTP error: timeout"
        );
    }

    #[test]
    fn rank_errors_pass_through() {
        let err: AppError = RankError::InvalidRequest("page must be >= 1".into()).into();
        assert_eq!(err.to_string(), "invalid request: page must be >= 1");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "resume.pdf");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().contains("resume.pdf"));
    }
}
