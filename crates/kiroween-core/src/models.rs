//! Domain models for the Kiroween resource kinds.
//!
//! Every generated app exposes one or more resource kinds through the
//! same CRUD module pattern. [`Resource`] ties a record type to its
//! create/update payloads and its [`ResourceKind`].

pub mod note;
pub mod spell;
pub mod task;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::schema::{self, ResourceSchema};

/// The entity kinds a generated app can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Note,
    Spell,
    Task,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Note, ResourceKind::Spell, ResourceKind::Task];

    /// Singular name, also used as the SurrealDB table name.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Note => "note",
            ResourceKind::Spell => "spell",
            ResourceKind::Task => "task",
        }
    }

    /// Plural collection name used in the route prefix (`/api/<collection>`).
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Note => "notes",
            ResourceKind::Spell => "spells",
            ResourceKind::Task => "tasks",
        }
    }

    /// Client-facing message for a missing record.
    pub fn not_found_message(self) -> &'static str {
        match self {
            ResourceKind::Note => "Note not found",
            ResourceKind::Spell => "Spell lost in the void",
            ResourceKind::Task => "Task not found",
        }
    }

    pub fn schema(self) -> &'static ResourceSchema {
        match self {
            ResourceKind::Note => &schema::NOTE_SCHEMA,
            ResourceKind::Spell => &schema::SPELL_SCHEMA,
            ResourceKind::Task => &schema::TASK_SCHEMA,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A persisted record of one resource kind.
///
/// `Create` and `Update` are the wire payloads. Their serde field names
/// must match the field names of [`ResourceKind::schema`].
pub trait Resource: Serialize + Clone + Send + Sync + 'static {
    type Create: Serialize + DeserializeOwned + Send + Sync + 'static;
    type Update: Serialize + DeserializeOwned + Default + Send + Sync + 'static;

    const KIND: ResourceKind;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}
