/**
 * Backend Error Types
 *
 * This module defines the error type shared by every handler. Each variant
 * maps to one HTTP status code.
 *
 * # Status Mapping
 *
 * - validation failures → 400
 * - missing or invalid credentials → 401
 * - acting on someone else's resource → 403
 * - unknown ids → 404
 * - state conflicts (duplicates, non-pending requests) → 409
 * - database, hashing and token-signing failures → 500
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Result alias used by handlers
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use chatline::backend::error::BackendError;
///
/// let err = BackendError::not_found("Chat not found");
/// assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status (bad input, permissions, conflicts)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Server-side state could not be used
    #[error("State error: {message}")]
    StateError {
        /// Human-readable error message
        message: String,
    },

    /// Shared error (validation, status transitions, serialization)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Token signing failure
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, message)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::TransitionError { .. } => StatusCode::CONFLICT,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::StateError { .. }
            | Self::Database(_)
            | Self::Hashing(_)
            | Self::Token(_)
            | Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client
    ///
    /// Internal failures get a generic message; the details only go to the log.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(err) if self.status_code().is_client_error() => err.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}
