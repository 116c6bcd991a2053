//! Resource controllers: one generic set of handlers shared by every
//! resource kind.
//!
//! Handlers parse the raw body themselves so that malformed JSON and
//! oversized bodies surface as validation failures in the error
//! envelope instead of framework rejections.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use kiroween_core::error::{KiroweenError, KiroweenResult};
use kiroween_core::models::Resource;
use kiroween_core::repository::ResourceRepository;
use kiroween_core::validation::{validate_create, validate_update};
use kiroween_service::ResourceService;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::envelope::{ApiResponse, PageMeta};
use super::error::ApiError;

pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const MAX_PAGE_LIMIT: u64 = 100;

type SharedService<R, Repo> = Arc<ResourceService<R, Repo>>;

/// Optional pagination query for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeletedId {
    pub id: Uuid,
}

/// Routes for one resource kind under `prefix` (e.g. `/api/spells`).
///
/// The collection is served both with and without a trailing slash.
pub fn resource_router<R, Repo>(prefix: &str, service: ResourceService<R, Repo>) -> Router
where
    R: Resource,
    Repo: ResourceRepository<R> + 'static,
{
    let collection = get(list::<R, Repo>).post(create::<R, Repo>);
    Router::new()
        .route(prefix, collection.clone())
        .route(&format!("{prefix}/"), collection)
        .route(
            &format!("{prefix}/{{id}}"),
            get(get_one::<R, Repo>)
                .put(update::<R, Repo>)
                .delete(delete::<R, Repo>),
        )
        .with_state(Arc::new(service))
}

pub async fn list<R, Repo>(
    State(service): State<SharedService<R, Repo>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<R>>>, ApiError>
where
    R: Resource,
    Repo: ResourceRepository<R> + 'static,
{
    let Query(params) = params.map_err(|rejection| {
        KiroweenError::validation("query", format!("Invalid query: {}", rejection.body_text()))
    })?;

    if params.page.is_none() && params.limit.is_none() {
        let records = service.get_all().await?;
        return Ok(Json(ApiResponse::success(records)));
    }

    let (page, limit) = page_window(&params)?;
    let result = service.get_page(page, limit).await?;
    let meta = PageMeta {
        page,
        limit,
        total: result.total,
    };
    Ok(Json(ApiResponse::paginated(result.items, meta)))
}

pub async fn get_one<R, Repo>(
    State(service): State<SharedService<R, Repo>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<R>>, ApiError>
where
    R: Resource,
    Repo: ResourceRepository<R> + 'static,
{
    let record = service.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(record)))
}

pub async fn create<R, Repo>(
    State(service): State<SharedService<R, Repo>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<ApiResponse<R>>), ApiError>
where
    R: Resource,
    Repo: ResourceRepository<R> + 'static,
{
    let payload = parse_body(body)?;
    let input = validate_create::<R>(&payload)?;
    let record = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

pub async fn update<R, Repo>(
    State(service): State<SharedService<R, Repo>>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ApiResponse<R>>, ApiError>
where
    R: Resource,
    Repo: ResourceRepository<R> + 'static,
{
    let payload = parse_body(body)?;
    let input = validate_update::<R>(&payload)?;
    let record = service.update(&id, input).await?;
    Ok(Json(ApiResponse::success(record)))
}

pub async fn delete<R, Repo>(
    State(service): State<SharedService<R, Repo>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedId>>, ApiError>
where
    R: Resource,
    Repo: ResourceRepository<R> + 'static,
{
    let id = service.delete(&id).await?;
    Ok(Json(ApiResponse::success(DeletedId { id })))
}

fn parse_body(body: Result<Bytes, BytesRejection>) -> KiroweenResult<Value> {
    let bytes = body.map_err(|rejection| {
        KiroweenError::validation("body", format!("Invalid request body: {}", rejection.body_text()))
    })?;
    // An absent body reads as an empty object, so an empty update is a no-op.
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(&bytes)
        .map_err(|_| KiroweenError::validation("body", "Request body must be valid JSON"))
}

fn page_window(params: &ListParams) -> KiroweenResult<(u64, u64)> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if page == 0 {
        return Err(KiroweenError::validation("page", "Page must be at least 1"));
    }
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(KiroweenError::validation(
            "limit",
            format!("Limit must be between 1 and {MAX_PAGE_LIMIT}"),
        ));
    }
    // The store binds START as a signed 64-bit integer.
    let offset_fits = (page - 1)
        .checked_mul(limit)
        .is_some_and(|offset| offset <= i64::MAX as u64);
    if !offset_fits {
        return Err(KiroweenError::validation("page", "Page is out of range"));
    }
    Ok((page, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_defaults_and_bounds() {
        let params = ListParams {
            page: None,
            limit: Some(5),
        };
        assert_eq!(page_window(&params).unwrap(), (1, 5));

        let params = ListParams {
            page: Some(0),
            limit: None,
        };
        assert!(page_window(&params).is_err());

        let params = ListParams {
            page: Some(1),
            limit: Some(MAX_PAGE_LIMIT + 1),
        };
        assert!(page_window(&params).is_err());
    }

    #[test]
    fn page_window_rejects_unrepresentable_offsets() {
        let params = ListParams {
            page: Some(u64::MAX),
            limit: Some(MAX_PAGE_LIMIT),
        };
        let err = page_window(&params).unwrap_err();
        assert!(matches!(err, KiroweenError::Validation { ref field, .. } if field == "page"));

        let params = ListParams {
            page: Some(100_000_000_000_000_000),
            limit: Some(MAX_PAGE_LIMIT),
        };
        assert!(page_window(&params).is_err());

        let params = ListParams {
            page: Some(i64::MAX as u64 / MAX_PAGE_LIMIT),
            limit: Some(MAX_PAGE_LIMIT),
        };
        assert!(page_window(&params).is_ok());
    }

    #[test]
    fn malformed_json_is_a_validation_failure() {
        let err = parse_body(Ok(Bytes::from_static(b"{not json"))).unwrap_err();
        assert!(matches!(err, KiroweenError::Validation { .. }));
    }

    #[test]
    fn empty_body_reads_as_empty_object() {
        assert_eq!(parse_body(Ok(Bytes::new())).unwrap(), Value::Object(Map::new()));
        assert_eq!(
            parse_body(Ok(Bytes::from_static(b" \n"))).unwrap(),
            Value::Object(Map::new())
        );
    }
}
