//! Error type definitions
//!
//! `ApiError` is the taxonomy every fallible core operation speaks:
//!
//! - `Validation` - a user-supplied field failed a trim/empty/length rule;
//!   always recoverable, surfaced with the violated constraint.
//! - `NotFound` - a referenced entity does not exist; distinguishable from
//!   validation failure at the transport level.
//! - `Duplicate` - a uniqueness rule was violated (thread titles).
//! - `Storage` - the durability layer failed; fatal to the in-flight
//!   operation only, never to the process, and never leaked to callers.

use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced by the service core and mapped onto transport status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A user-supplied field failed validation.
    #[error("{field} {message}")]
    Validation {
        /// The field that failed validation.
        field: &'static str,
        /// What rule it violated.
        message: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
    },

    /// A uniqueness rule was violated.
    #[error("{message}")]
    Duplicate { message: String },

    /// The storage layer failed. The display form is deliberately
    /// generic; the cause is logged, not surfaced.
    #[error("internal server error")]
    Storage(#[from] sqlx::Error),
}

impl ApiError {
    /// Create a validation error for a named field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a not-found error for a kind of entity.
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Create a duplicate error.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }

    /// The HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Duplicate { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The caller-visible message.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
