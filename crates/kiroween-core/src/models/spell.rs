//! Spell domain model (grimoire app).
//!
//! A spell carries three free-text fields and a power rating bounded to
//! `1..=10`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Resource, ResourceKind};

pub const MIN_POWER_LEVEL: u8 = 1;
pub const MAX_POWER_LEVEL: u8 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub id: Uuid,
    pub name: String,
    pub incantation: String,
    pub ingredients: String,
    pub power_level: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to inscribe a new spell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpell {
    pub name: String,
    pub incantation: String,
    pub ingredients: String,
    pub power_level: u8,
}

/// Fields that can be updated on an existing spell.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpell {
    pub name: Option<String>,
    pub incantation: Option<String>,
    pub ingredients: Option<String>,
    pub power_level: Option<u8>,
}

impl Resource for Spell {
    type Create = CreateSpell;
    type Update = UpdateSpell;

    const KIND: ResourceKind = ResourceKind::Spell;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
