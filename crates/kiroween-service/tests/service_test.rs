//! Tests for the resource service against an in-process spy repository.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use kiroween_core::error::{KiroweenError, KiroweenResult};
use kiroween_core::models::ResourceKind;
use kiroween_core::models::task::{CreateTask, Task, TaskStatus, UpdateTask};
use kiroween_core::repository::{PaginatedResult, Pagination, ResourceRepository};
use kiroween_core::validation::{validate_create, validate_update};
use kiroween_service::ResourceService;
use serde_json::json;
use uuid::Uuid;

#[derive(Default)]
struct SpyState {
    records: Mutex<Vec<Task>>,
    writes: AtomicUsize,
    unavailable: bool,
}

/// Task repository that records every write-path call. Clones share
/// state, so a test can keep a handle after moving one into the service.
#[derive(Clone, Default)]
struct SpyTaskRepository(Arc<SpyState>);

impl std::ops::Deref for SpyTaskRepository {
    type Target = SpyState;

    fn deref(&self) -> &SpyState {
        &self.0
    }
}

impl SpyTaskRepository {
    fn unavailable() -> Self {
        Self(Arc::new(SpyState {
            unavailable: true,
            ..Default::default()
        }))
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> KiroweenResult<()> {
        if self.unavailable {
            return Err(KiroweenError::Database("connection refused".into()));
        }
        Ok(())
    }
}

impl ResourceRepository<Task> for SpyTaskRepository {
    async fn list_all(&self) -> KiroweenResult<Vec<Task>> {
        self.check_available()?;
        let mut tasks = self.records.lock().unwrap().clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn list(&self, pagination: Pagination) -> KiroweenResult<PaginatedResult<Task>> {
        let all = self.list_all().await?;
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect();
        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> KiroweenResult<Task> {
        self.check_available()?;
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| KiroweenError::not_found(ResourceKind::Task, id.to_string()))
    }

    async fn create(&self, input: CreateTask) -> KiroweenResult<Task> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        // Keep creation instants distinct so ordering is deterministic.
        let now = records
            .iter()
            .map(|t| t.created_at + Duration::microseconds(1))
            .fold(Utc::now(), |acc, t| acc.max(t));
        let task = Task {
            id: Uuid::new_v4(),
            title: input.title,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        records.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: Uuid, input: UpdateTask) -> KiroweenResult<Task> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let task = records
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| KiroweenError::not_found(ResourceKind::Task, id.to_string()))?;
        if let Some(title) = input.title {
            task.title = title;
        }
        if let Some(status) = input.status {
            task.status = status;
        }
        task.updated_at = Utc::now().max(task.updated_at + Duration::microseconds(1));
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid) -> KiroweenResult<()> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }
}

type TaskService = ResourceService<Task, SpyTaskRepository>;

async fn seed(svc: &TaskService, title: &str, status: &str) -> Task {
    let input = validate_create::<Task>(&json!({"title": title, "status": status})).unwrap();
    svc.create(input).await.unwrap()
}

fn assert_not_found(err: KiroweenError) {
    assert!(
        matches!(err, KiroweenError::NotFound { kind: ResourceKind::Task, .. }),
        "expected NotFound, got {err:?}"
    );
}

#[tokio::test]
async fn create_assigns_fresh_ids_and_equal_timestamps() {
    let svc = TaskService::new(SpyTaskRepository::default());

    let a = seed(&svc, "Light candles", "pending").await;
    let b = seed(&svc, "Summon bats", "pending").await;

    assert_ne!(a.id, b.id);
    assert_eq!(a.created_at, a.updated_at);
    assert_eq!(b.created_at, b.updated_at);
}

#[tokio::test]
async fn update_keeps_omitted_fields() {
    let svc = TaskService::new(SpyTaskRepository::default());
    let task = seed(&svc, "Brew potion", "in-progress").await;

    let patch = validate_update::<Task>(&json!({"title": "x"})).unwrap();
    let updated = svc.update(&task.id.to_string(), patch).await.unwrap();

    assert_eq!(updated.title, "x");
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.created_at, task.created_at);
    assert!(updated.updated_at > task.updated_at);
}

#[tokio::test]
async fn update_of_missing_id_never_writes() {
    let spy = SpyTaskRepository::default();
    let svc = TaskService::new(spy.clone());

    let patch = validate_update::<Task>(&json!({"title": "x"})).unwrap();
    let err = svc
        .update(&Uuid::new_v4().to_string(), patch)
        .await
        .unwrap_err();

    assert_not_found(err);
    assert_eq!(spy.writes(), 0);
}

#[tokio::test]
async fn delete_twice_is_not_found_the_second_time() {
    let spy = SpyTaskRepository::default();
    let svc = TaskService::new(spy.clone());
    let task = seed(&svc, "Bury time capsule", "pending").await;
    let id = task.id.to_string();

    assert_eq!(svc.delete(&id).await.unwrap(), task.id);
    let writes_after_first = spy.writes();

    assert_not_found(svc.delete(&id).await.unwrap_err());
    assert_eq!(spy.writes(), writes_after_first);
}

#[tokio::test]
async fn malformed_id_is_not_found() {
    let svc = TaskService::new(SpyTaskRepository::default());

    assert_not_found(svc.get_by_id("not-a-uuid").await.unwrap_err());
    assert_not_found(svc.delete("").await.unwrap_err());
}

#[tokio::test]
async fn get_all_is_newest_first() {
    let svc = TaskService::new(SpyTaskRepository::default());
    let first = seed(&svc, "one", "pending").await;
    let second = seed(&svc, "two", "pending").await;
    let third = seed(&svc, "three", "pending").await;

    let ids: Vec<Uuid> = svc.get_all().await.unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn get_page_reports_total() {
    let svc = TaskService::new(SpyTaskRepository::default());
    for i in 0..5 {
        seed(&svc, &format!("task {i}"), "pending").await;
    }

    let page = svc.get_page(2, 2).await.unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "task 2");
}

#[tokio::test]
async fn store_failures_propagate_unchanged() {
    let svc = TaskService::new(SpyTaskRepository::unavailable());

    let err = svc.get_all().await.unwrap_err();
    assert!(matches!(err, KiroweenError::Database(ref msg) if msg == "connection refused"));

    let err = svc
        .get_by_id(&Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, KiroweenError::Database(_)));
}
