//! Error types

use std::time::Duration;

use crate::submission::SubmissionEvent;
use crate::submission::SubmissionState;

pub use crate::validation::FieldError as ValidationError;

/// Failure to get a usable response from the backend at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The backend could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete in time.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// A response arrived but could not be read.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Non-2xx response from the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP {status}: {message}")]
pub struct BackendError {
    /// HTTP status code.
    pub status: u16,
    /// The body's `message` field, or a generic status description.
    pub message: String,
}

/// Why a submission ended in [`SubmissionState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl SubmitError {
    /// Text carried by `Failed(reason)`.
    ///
    /// Backend messages are passed through verbatim.
    pub fn reason(&self) -> String {
        match self {
            Self::Backend(err) => err.message.clone(),
            Self::Transport(err) => err.to_string(),
        }
    }

    /// Returns the HTTP status code if the backend answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Backend(err) => Some(err.status),
            Self::Transport(_) => None,
        }
    }

    /// Returns `true` if resubmitting unchanged data could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Backend(err) => matches!(err.status, 429 | 500 | 502 | 503 | 504),
        }
    }
}

/// An event that the submission state machine does not accept in its current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot apply {event:?} while {from}")]
pub struct TransitionError {
    pub from: SubmissionState,
    pub event: SubmissionEvent,
}

/// Invalid rule definition.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
