//! Resource service: existence checks and persistence orchestration.

use std::marker::PhantomData;

use kiroween_core::error::{KiroweenError, KiroweenResult};
use kiroween_core::models::{Resource, ResourceKind};
use kiroween_core::repository::{PaginatedResult, Pagination, ResourceRepository};
use kiroween_core::validation::Validated;
use tracing::info;
use uuid::Uuid;

/// CRUD orchestration for one resource kind.
///
/// Generic over the repository implementation so that the service layer
/// has no dependency on the database crate. Mutations go through an
/// existence check first: a missing id yields `NotFound` and never
/// reaches the repository's write path.
pub struct ResourceService<R: Resource, Repo: ResourceRepository<R>> {
    repo: Repo,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, Repo: ResourceRepository<R>> ResourceService<R, Repo> {
    pub fn new(repo: Repo) -> Self {
        Self {
            repo,
            _resource: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    /// Every record, newest first.
    pub async fn get_all(&self) -> KiroweenResult<Vec<R>> {
        self.repo.list_all().await
    }

    /// One page (1-based) of the same ordering as [`get_all`](Self::get_all).
    pub async fn get_page(&self, page: u64, limit: u64) -> KiroweenResult<PaginatedResult<R>> {
        self.repo.list(Pagination::page(page, limit)).await
    }

    /// Look up a record by its opaque string id.
    ///
    /// Ids that are not UUIDs cannot exist in the store, so they are
    /// reported as `NotFound` without a round-trip.
    pub async fn get_by_id(&self, id: &str) -> KiroweenResult<R> {
        let uuid = Uuid::parse_str(id).map_err(|_| KiroweenError::not_found(R::KIND, id))?;
        self.repo.get_by_id(uuid).await
    }

    pub async fn create(&self, input: Validated<R::Create>) -> KiroweenResult<R> {
        let record = self.repo.create(input.into_inner()).await?;
        info!(kind = %R::KIND, id = %record.id(), "Created record");
        Ok(record)
    }

    /// Partial update. Fields absent from `input` keep their value.
    pub async fn update(&self, id: &str, input: Validated<R::Update>) -> KiroweenResult<R> {
        let existing = self.get_by_id(id).await?;
        let record = self.repo.update(existing.id(), input.into_inner()).await?;
        info!(kind = %R::KIND, id = %record.id(), "Updated record");
        Ok(record)
    }

    /// Delete a record, returning only its id.
    pub async fn delete(&self, id: &str) -> KiroweenResult<Uuid> {
        let existing = self.get_by_id(id).await?;
        self.repo.delete(existing.id()).await?;
        info!(kind = %R::KIND, id = %existing.id(), "Deleted record");
        Ok(existing.id())
    }
}
