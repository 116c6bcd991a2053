//! Schema definitions and migration runner for SurrealDB.
//!
//! Resource tables use SCHEMAFULL mode. UUIDs are record keys stored as
//! strings, and field ASSERTs mirror the validation tables in
//! `kiroween-core` so the store rejects anything that slips past them.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "resource_tables",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: notes, spells, tasks
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Notes (grimoire)
-- =======================================================================
DEFINE TABLE note SCHEMAFULL;
DEFINE FIELD title ON TABLE note TYPE string \
    ASSERT string::len($value) <= 200;
DEFINE FIELD content ON TABLE note TYPE string;
DEFINE FIELD created_at ON TABLE note TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE note TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_note_created_at ON TABLE note COLUMNS created_at;

-- =======================================================================
-- Spells (grimoire)
-- =======================================================================
DEFINE TABLE spell SCHEMAFULL;
DEFINE FIELD name ON TABLE spell TYPE string \
    ASSERT string::len($value) <= 200;
DEFINE FIELD incantation ON TABLE spell TYPE string;
DEFINE FIELD ingredients ON TABLE spell TYPE string;
DEFINE FIELD power_level ON TABLE spell TYPE int \
    ASSERT $value >= 1 AND $value <= 10;
DEFINE FIELD created_at ON TABLE spell TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE spell TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_spell_created_at ON TABLE spell COLUMNS created_at;

-- =======================================================================
-- Tasks (tasks app)
-- =======================================================================
DEFINE TABLE task SCHEMAFULL;
DEFINE FIELD title ON TABLE task TYPE string \
    ASSERT string::len($value) <= 200;
DEFINE FIELD status ON TABLE task TYPE string \
    ASSERT $value IN ['pending', 'in-progress', 'completed'] \
    DEFAULT 'pending';
DEFINE FIELD created_at ON TABLE task TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE task TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_task_created_at ON TABLE task COLUMNS created_at;
";

/// Run all pending migrations against the given database.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
