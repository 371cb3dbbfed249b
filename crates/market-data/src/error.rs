//! HTTP client error types.

use thiserror::Error;

/// Errors that can occur when calling a remote service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, reset).
    #[error("Request failed: {0}")]
    Transport(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx response.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Status code.
        status: u16,
        /// Requested URL.
        url: String,
        /// Response body or reason phrase.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Request body could not be serialized.
    #[error("JSON error: {0}")]
    Json(String),
}

impl FetchError {
    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True if the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        let err = FetchError::Http {
            status: 404,
            url: "https://api.example.com/products/9".to_string(),
            message: "Not Found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(FetchError::Transport("reset".into()).status(), None);
    }

    #[test]
    fn test_display() {
        let err = FetchError::Http {
            status: 500,
            url: "https://api.example.com/banners".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 500 from https://api.example.com/banners: boom"
        );
    }
}
