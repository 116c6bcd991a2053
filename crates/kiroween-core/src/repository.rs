//! Repository trait definitions for data access abstraction.
//!
//! One repository serves one resource kind. All operations are async
//! and may fail with [`KiroweenError::Database`] when the store is
//! unavailable; callers propagate that unchanged.
//!
//! [`KiroweenError::Database`]: crate::error::KiroweenError::Database

use uuid::Uuid;

use crate::error::KiroweenResult;
use crate::models::Resource;

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    /// Window for a 1-based page number.
    pub fn page(page: u64, limit: u64) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 20,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait ResourceRepository<R: Resource>: Send + Sync {
    /// Every record, newest (`created_at`) first.
    fn list_all(&self) -> impl Future<Output = KiroweenResult<Vec<R>>> + Send;

    /// One window of [`list_all`](Self::list_all)'s ordering plus the total count.
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = KiroweenResult<PaginatedResult<R>>> + Send;

    /// Fails with `NotFound` when no record has this id.
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = KiroweenResult<R>> + Send;

    /// Assigns `id`, `created_at` and `updated_at` (equal at creation).
    fn create(&self, input: R::Create) -> impl Future<Output = KiroweenResult<R>> + Send;

    /// Merges the present fields and bumps `updated_at`.
    fn update(&self, id: Uuid, input: R::Update) -> impl Future<Output = KiroweenResult<R>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = KiroweenResult<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_are_one_based() {
        assert_eq!(Pagination::page(1, 20).offset, 0);
        assert_eq!(Pagination::page(3, 10).offset, 20);
        assert_eq!(Pagination::page(0, 10).offset, 0);
    }
}
