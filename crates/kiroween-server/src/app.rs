//! Application assembly: repositories, services and controllers are
//! built here and handed to the router explicitly.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::get;
use kiroween_core::models::ResourceKind;
use kiroween_db::repository::{
    SurrealNoteRepository, SurrealSpellRepository, SurrealTaskRepository,
};
use kiroween_service::ResourceService;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::config::ServerConfig;
use crate::http::error::route_not_found;
use crate::http::health::health;
use crate::http::middleware::{cors, trace_requests};
use crate::http::resource_router;

/// Build the full router for the configured app profile.
pub fn build_router<C: Connection>(db: Surreal<C>, config: &ServerConfig) -> Router {
    let mut router = Router::new().route("/health", get(health));

    for &kind in config.profile.resources() {
        let prefix = format!("/api/{}", kind.collection());
        info!(kind = %kind, prefix = %prefix, "Mounting resource module");
        router = router.merge(module_router(kind, &prefix, db.clone()));
    }

    router
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(from_fn(cors))
        .layer(from_fn(trace_requests))
}

fn module_router<C: Connection>(kind: ResourceKind, prefix: &str, db: Surreal<C>) -> Router {
    match kind {
        ResourceKind::Note => {
            resource_router(prefix, ResourceService::new(SurrealNoteRepository::new(db)))
        }
        ResourceKind::Spell => {
            resource_router(prefix, ResourceService::new(SurrealSpellRepository::new(db)))
        }
        ResourceKind::Task => {
            resource_router(prefix, ResourceService::new(SurrealTaskRepository::new(db)))
        }
    }
}
