//! Database-specific error types and conversions.

use kiroween_core::error::KiroweenError;
use kiroween_core::models::ResourceKind;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Malformed row: {0}")]
    Decode(String),

    #[error("Record not found: {kind} with id {id}")]
    NotFound { kind: ResourceKind, id: String },
}

impl From<DbError> for KiroweenError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { kind, id } => KiroweenError::NotFound { kind, id },
            other => KiroweenError::Database(other.to_string()),
        }
    }
}
