//! SurrealDB implementation of the spell repository.

use chrono::{DateTime, Utc};
use kiroween_core::error::KiroweenResult;
use kiroween_core::models::ResourceKind;
use kiroween_core::models::spell::{CreateSpell, Spell, UpdateSpell};
use kiroween_core::repository::{PaginatedResult, Pagination, ResourceRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{count, not_found, parse_record_id};
use crate::error::DbError;

const KIND: ResourceKind = ResourceKind::Spell;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct SpellRow {
    name: String,
    incantation: String,
    ingredients: String,
    power_level: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct SpellRowWithId {
    record_id: String,
    name: String,
    incantation: String,
    ingredients: String,
    power_level: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_power_level(value: i64) -> Result<u8, DbError> {
    u8::try_from(value).map_err(|_| DbError::Decode(format!("power level out of range: {value}")))
}

impl SpellRow {
    fn into_spell(self, id: Uuid) -> Result<Spell, DbError> {
        Ok(Spell {
            id,
            name: self.name,
            incantation: self.incantation,
            ingredients: self.ingredients,
            power_level: parse_power_level(self.power_level)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl SpellRowWithId {
    fn try_into_spell(self) -> Result<Spell, DbError> {
        Ok(Spell {
            id: parse_record_id(&self.record_id)?,
            name: self.name,
            incantation: self.incantation,
            ingredients: self.ingredients,
            power_level: parse_power_level(self.power_level)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the spell repository.
#[derive(Clone)]
pub struct SurrealSpellRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSpellRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ResourceRepository<Spell> for SurrealSpellRepository<C> {
    async fn list_all(&self) -> KiroweenResult<Vec<Spell>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM spell ORDER BY created_at DESC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SpellRowWithId> = result.take(0).map_err(DbError::from)?;
        let spells = rows
            .into_iter()
            .map(SpellRowWithId::try_into_spell)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(spells)
    }

    async fn list(&self, pagination: Pagination) -> KiroweenResult<PaginatedResult<Spell>> {
        let total = count(&self.db, KIND).await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM spell \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SpellRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(SpellRowWithId::try_into_spell)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> KiroweenResult<Spell> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('spell', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SpellRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(KIND, id))?;

        Ok(row.into_spell(id)?)
    }

    async fn create(&self, input: CreateSpell) -> KiroweenResult<Spell> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let result = self
            .db
            .query(
                "CREATE type::record('spell', $id) SET \
                 name = $name, incantation = $incantation, \
                 ingredients = $ingredients, power_level = $power_level, \
                 created_at = $now, updated_at = $now",
            )
            .bind(("id", id.to_string()))
            .bind(("name", input.name))
            .bind(("incantation", input.incantation))
            .bind(("ingredients", input.ingredients))
            .bind(("power_level", i64::from(input.power_level)))
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<SpellRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(KIND, id))?;

        Ok(row.into_spell(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateSpell) -> KiroweenResult<Spell> {
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.incantation.is_some() {
            sets.push("incantation = $incantation");
        }
        if input.ingredients.is_some() {
            sets.push("ingredients = $ingredients");
        }
        if input.power_level.is_some() {
            sets.push("power_level = $power_level");
        }
        sets.push("updated_at = $now");

        let query = format!(
            "UPDATE type::record('spell', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("now", Utc::now()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(incantation) = input.incantation {
            builder = builder.bind(("incantation", incantation));
        }
        if let Some(ingredients) = input.ingredients {
            builder = builder.bind(("ingredients", ingredients));
        }
        if let Some(power_level) = input.power_level {
            builder = builder.bind(("power_level", i64::from(power_level)));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<SpellRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(KIND, id))?;

        Ok(row.into_spell(id)?)
    }

    async fn delete(&self, id: Uuid) -> KiroweenResult<()> {
        let mut result = self
            .db
            .query("DELETE type::record('spell', $id) RETURN BEFORE")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SpellRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(not_found(KIND, id).into());
        }

        Ok(())
    }
}
