//! Error types for the Kiroween backends.

use thiserror::Error;

use crate::models::ResourceKind;

#[derive(Debug, Error)]
pub enum KiroweenError {
    /// The first rule a payload violated. `message` is client-facing.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{} not found: {id}", kind.name())]
    NotFound { kind: ResourceKind, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl KiroweenError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type KiroweenResult<T> = Result<T, KiroweenError>;
