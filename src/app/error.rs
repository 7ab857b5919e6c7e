use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelfeedError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not authorized (HTTP 401)")]
    Unauthorized,

    #[error("Access forbidden (HTTP 403)")]
    Forbidden,

    #[error("Server responded with HTTP {status}")]
    Status { status: u16 },

    #[error("Malformed page: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid page request: {0}")]
    InvalidRequest(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}

impl ReelfeedError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ReelfeedError::Unauthorized => Some(401),
            ReelfeedError::Forbidden => Some(403),
            ReelfeedError::Status { status } => Some(*status),
            ReelfeedError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether a retry policy may attempt the failed operation again.
    ///
    /// Authorization failures are handed to the caller immediately, as are
    /// errors that would fail identically on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ReelfeedError::Http(_) | ReelfeedError::Status { .. } | ReelfeedError::Io(_) => true,
            ReelfeedError::Unauthorized
            | ReelfeedError::Forbidden
            | ReelfeedError::Decode(_)
            | ReelfeedError::InvalidUrl(_)
            | ReelfeedError::InvalidRequest(_)
            | ReelfeedError::InvalidFilter(_)
            | ReelfeedError::Database(_)
            | ReelfeedError::Config(_)
            | ReelfeedError::Storage(_)
            | ReelfeedError::Other(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReelfeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_is_not_retryable() {
        assert!(!ReelfeedError::Forbidden.is_retryable());
        assert_eq!(ReelfeedError::Forbidden.status(), Some(403));
    }

    #[test]
    fn test_unauthorized_is_not_retryable() {
        assert!(!ReelfeedError::Unauthorized.is_retryable());
        assert_eq!(ReelfeedError::Unauthorized.status(), Some(401));
    }

    #[test]
    fn test_server_errors_are_retryable() {
        let err = ReelfeedError::Status { status: 500 };
        assert!(err.is_retryable());
        assert_eq!(err.status(), Some(500));

        let err = ReelfeedError::Status { status: 404 };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_invalid_request_is_not_retryable() {
        let err = ReelfeedError::InvalidRequest("limit must be positive".into());
        assert!(!err.is_retryable());
        assert_eq!(err.status(), None);
    }
}
