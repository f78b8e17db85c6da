//! Error types for the relais libraries.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for relais operations.
///
/// This error type covers all possible failure modes in the SDK, with
/// explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (invalid credentials, expired session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// API errors passed through from the backend.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session persistence errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (invalid URL format).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// True when this is the recoverable authorization-failure class: the
    /// backend rejected the presented access credential.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::Api(api) if api.is_auth_error())
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// DNS resolution failed.
    #[error("DNS resolution failed: {host}")]
    Dns { host: String },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    Tls { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Session has expired.
    #[error("session expired")]
    SessionExpired,

    /// Refresh token is invalid or expired.
    #[error("refresh token invalid")]
    RefreshTokenInvalid,

    /// No session is established.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// An error response from the backend, passed through untouched.
///
/// Domain failures (validation, not-found, conflict) surface here and are
/// the caller's responsibility to display; only the 401 class is handled
/// by the session guard.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Error string from the response body, if present.
    pub error: Option<String>,
    /// Human-readable message from the response body, if present.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if this is an authorization failure.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
    }
}

/// Session persistence errors.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StorageError {
    message: String,
}

impl StorageError {
    /// Create a new storage error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL format.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_and_body() {
        let err = ApiError::new(
            401,
            Some("Token expiré".to_string()),
            Some("please log in again".to_string()),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("401"));
        assert!(rendered.contains("Token expiré"));
        assert!(rendered.contains("please log in again"));
    }

    #[test]
    fn timeout_renders_without_a_duration() {
        let err = Error::Transport(TransportError::Timeout);
        assert_eq!(err.to_string(), "transport error: request timed out");
    }

    #[test]
    fn only_401_is_an_auth_failure() {
        let unauthorized = Error::Api(ApiError::new(401, None, None));
        let not_found = Error::Api(ApiError::new(404, None, None));
        let transport = Error::Transport(TransportError::Connection {
            message: "refused".to_string(),
        });

        assert!(unauthorized.is_auth_failure());
        assert!(!not_found.is_auth_failure());
        assert!(!transport.is_auth_failure());
    }
}
