//! Shared Error Types
//!
//! Errors raised by the pure domain logic in `shared`, before any database
//! or HTTP concern is involved.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - A request field failed a format or length rule
//! - `TransitionError` - A friend request was asked to move to a status it cannot reach
//!
//! # Usage
//!
//! ```rust
//! use chatline::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "Message cannot be empty");
//! ```
use thiserror::Error;

/// Shared error types raised by domain validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Invalid status transition
    #[error("Cannot move from '{from}' to '{to}'")]
    TransitionError {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new transition error
    pub fn transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::TransitionError {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
