//! SurrealDB implementation of the note repository.

use chrono::{DateTime, Utc};
use kiroween_core::error::KiroweenResult;
use kiroween_core::models::ResourceKind;
use kiroween_core::models::note::{CreateNote, Note, UpdateNote};
use kiroween_core::repository::{PaginatedResult, Pagination, ResourceRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{count, not_found, parse_record_id};
use crate::error::DbError;

const KIND: ResourceKind = ResourceKind::Note;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct NoteRow {
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct NoteRowWithId {
    record_id: String,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NoteRow {
    fn into_note(self, id: Uuid) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl NoteRowWithId {
    fn try_into_note(self) -> Result<Note, DbError> {
        Ok(Note {
            id: parse_record_id(&self.record_id)?,
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the note repository.
#[derive(Clone)]
pub struct SurrealNoteRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealNoteRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ResourceRepository<Note> for SurrealNoteRepository<C> {
    async fn list_all(&self) -> KiroweenResult<Vec<Note>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM note ORDER BY created_at DESC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<NoteRowWithId> = result.take(0).map_err(DbError::from)?;
        let notes = rows
            .into_iter()
            .map(NoteRowWithId::try_into_note)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(notes)
    }

    async fn list(&self, pagination: Pagination) -> KiroweenResult<PaginatedResult<Note>> {
        let total = count(&self.db, KIND).await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM note \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<NoteRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(NoteRowWithId::try_into_note)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> KiroweenResult<Note> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('note', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<NoteRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(KIND, id))?;

        Ok(row.into_note(id))
    }

    async fn create(&self, input: CreateNote) -> KiroweenResult<Note> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let result = self
            .db
            .query(
                "CREATE type::record('note', $id) SET \
                 title = $title, content = $content, \
                 created_at = $now, updated_at = $now",
            )
            .bind(("id", id.to_string()))
            .bind(("title", input.title))
            .bind(("content", input.content))
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<NoteRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(KIND, id))?;

        Ok(row.into_note(id))
    }

    async fn update(&self, id: Uuid, input: UpdateNote) -> KiroweenResult<Note> {
        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.content.is_some() {
            sets.push("content = $content");
        }
        sets.push("updated_at = $now");

        let query = format!(
            "UPDATE type::record('note', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("now", Utc::now()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(content) = input.content {
            builder = builder.bind(("content", content));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<NoteRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(KIND, id))?;

        Ok(row.into_note(id))
    }

    async fn delete(&self, id: Uuid) -> KiroweenResult<()> {
        let mut result = self
            .db
            .query("DELETE type::record('note', $id) RETURN BEFORE")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<NoteRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(not_found(KIND, id).into());
        }

        Ok(())
    }
}
