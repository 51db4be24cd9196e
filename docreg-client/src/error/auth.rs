//! Authentication error types

/// Errors that can occur while obtaining or using a bearer token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong email or password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No token has been stored yet; the user must log in.
    #[error("Not logged in")]
    MissingToken,

    /// The stored token expired.
    #[error("Token expired: {message}")]
    TokenExpired { message: String },
}
