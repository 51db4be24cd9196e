//! API error types

use std::time::Duration;

/// Errors that can occur during API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP error response from the API.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// The body's `message`, or a generic description of the status.
        message: String,
    },

    /// Network error during API call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Postal code that is not 8 digits, rejected before any request.
    #[error("CEP must have 8 digits: '{0}'")]
    InvalidCep(String),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Builds an HTTP error from a non-2xx response body.
    ///
    /// Uses the body's JSON `message` when present, otherwise `HTTP {status} error`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = docreg_forms::Response::new(status, body)
            .message()
            .unwrap_or_else(|| format!("HTTP {} error", status));
        Self::http(status, message)
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_uses_message() {
        let err = ApiError::from_response(409, r#"{"message":"Employee already registered"}"#);
        assert_eq!(err.status_code(), Some(409));
        assert_eq!(err.to_string(), "HTTP 409: Employee already registered");
    }

    #[test]
    fn test_from_response_fallback() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, ApiError::Http { ref message, .. } if message == "HTTP 502 error"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_client_errors_not_retryable() {
        assert!(!ApiError::http(400, "bad").is_retryable());
        assert!(!ApiError::parse("eof").is_retryable());
        assert!(ApiError::Timeout(Duration::from_secs(1)).is_retryable());
    }
}
