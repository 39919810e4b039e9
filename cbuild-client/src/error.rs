//! Errors returned by the build service client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure of a single call to the build service
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service could not be reached or the connection broke
    #[error("request to build service failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("build service returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("unexpected response from build service: {0}")]
    ParseError(String),

    /// The call was rejected locally before anything was sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Whether the service reported the addressed resource as missing
    ///
    /// A log stream is missing until the build writes its first line.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(ClientError::api_error(404, "no such stream").is_not_found());
        assert!(!ClientError::api_error(500, "boom").is_not_found());
        assert!(!ClientError::InvalidRequest("empty key".to_string()).is_not_found());
    }

    #[test]
    fn test_display() {
        let err = ClientError::api_error(400, "bad project");
        assert_eq!(err.to_string(), "build service returned 400: bad project");
    }
}
