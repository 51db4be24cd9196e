//! Error types

mod api;
mod auth;

pub use api::*;
pub use auth::*;

/// Top-level error returned by client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A configuration value could not be used.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Returns the HTTP status code if the backend answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(err) => err.status_code(),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Backend messages are passed through unchanged.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Http { message, .. }) => message.clone(),
            other => other.to_string(),
        }
    }
}
