//! Response handed back by a `send` collaborator

use serde::de::DeserializeOwned;

use crate::error::BackendError;
use crate::error::TransportError;

/// Status and raw body of a completed backend request.
///
/// `send` implementations build this from whatever transport they use; the
/// controller only looks at the status and the optional JSON `message` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Builds a response whose body is `value` serialized as JSON.
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body's top-level `message` string, if the body is a JSON object with one.
    pub fn message(&self) -> Option<String> {
        let json: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        json.get("message")?.as_str().map(str::to_string)
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(|e| TransportError::malformed(e.to_string()))
    }

    /// Splits the response into success and [`BackendError`].
    pub fn error_for_status(self) -> Result<Self, BackendError> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .message()
            .unwrap_or_else(|| format!("HTTP {} error", self.status));
        Err(BackendError {
            status: self.status,
            message,
        })
    }
}
