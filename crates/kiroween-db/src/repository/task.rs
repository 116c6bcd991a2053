//! SurrealDB implementation of the task repository.
//!
//! Task status is stored as its kebab-case wire string.

use chrono::{DateTime, Utc};
use kiroween_core::error::KiroweenResult;
use kiroween_core::models::ResourceKind;
use kiroween_core::models::task::{CreateTask, Task, TaskStatus, UpdateTask};
use kiroween_core::repository::{PaginatedResult, Pagination, ResourceRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{count, not_found, parse_record_id};
use crate::error::DbError;

const KIND: ResourceKind = ResourceKind::Task;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TaskRow {
    title: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TaskRowWithId {
    record_id: String,
    title: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<TaskStatus, DbError> {
    s.parse().map_err(DbError::Decode)
}

impl TaskRow {
    fn into_task(self, id: Uuid) -> Result<Task, DbError> {
        Ok(Task {
            id,
            title: self.title,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TaskRowWithId {
    fn try_into_task(self) -> Result<Task, DbError> {
        Ok(Task {
            id: parse_record_id(&self.record_id)?,
            title: self.title,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the task repository.
#[derive(Clone)]
pub struct SurrealTaskRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTaskRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ResourceRepository<Task> for SurrealTaskRepository<C> {
    async fn list_all(&self) -> KiroweenResult<Vec<Task>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM task ORDER BY created_at DESC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TaskRowWithId> = result.take(0).map_err(DbError::from)?;
        let tasks = rows
            .into_iter()
            .map(TaskRowWithId::try_into_task)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(tasks)
    }

    async fn list(&self, pagination: Pagination) -> KiroweenResult<PaginatedResult<Task>> {
        let total = count(&self.db, KIND).await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM task \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TaskRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(TaskRowWithId::try_into_task)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> KiroweenResult<Task> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('task', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(KIND, id))?;

        Ok(row.into_task(id)?)
    }

    async fn create(&self, input: CreateTask) -> KiroweenResult<Task> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let result = self
            .db
            .query(
                "CREATE type::record('task', $id) SET \
                 title = $title, status = $status, \
                 created_at = $now, updated_at = $now",
            )
            .bind(("id", id.to_string()))
            .bind(("title", input.title))
            .bind(("status", input.status.as_str()))
            .bind(("now", now))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(KIND, id))?;

        Ok(row.into_task(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateTask) -> KiroweenResult<Task> {
        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        sets.push("updated_at = $now");

        let query = format!(
            "UPDATE type::record('task', $id) SET {}",
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
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| not_found(KIND, id))?;

        Ok(row.into_task(id)?)
    }

    async fn delete(&self, id: Uuid) -> KiroweenResult<()> {
        let mut result = self
            .db
            .query("DELETE type::record('task', $id) RETURN BEFORE")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TaskRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(not_found(KIND, id).into());
        }

        Ok(())
    }
}
