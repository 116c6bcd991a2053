//! SurrealDB repository implementations, one per resource kind.

mod note;
mod spell;
mod task;

pub use note::SurrealNoteRepository;
pub use spell::SurrealSpellRepository;
pub use task::SurrealTaskRepository;

use kiroween_core::models::ResourceKind;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Total number of records in a resource table.
async fn count<C: Connection>(db: &Surreal<C>, kind: ResourceKind) -> Result<u64, DbError> {
    let mut result = db
        .query(format!(
            "SELECT count() AS total FROM {} GROUP ALL",
            kind.name()
        ))
        .await?;
    let rows: Vec<CountRow> = result.take(0)?;
    Ok(rows.first().map(|r| r.total).unwrap_or(0))
}

/// Parse the key half of a record id returned by `meta::id(id)`.
fn parse_record_id(record_id: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(record_id).map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))
}

fn not_found(kind: ResourceKind, id: Uuid) -> DbError {
    DbError::NotFound {
        kind,
        id: id.to_string(),
    }
}
