//! Error translation: every failure raised behind a controller ends up
//! here and leaves as an HTTP status plus the error envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kiroween_core::error::KiroweenError;
use tracing::error;

use super::envelope::ApiResponse;

/// Message returned for every unclassified failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// A failure on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub KiroweenError);

impl From<KiroweenError> for ApiError {
    fn from(err: KiroweenError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status and client-facing message for this failure.
    ///
    /// Unclassified failures are logged here with their detail; the
    /// detail never reaches the response.
    pub fn classify(&self) -> (StatusCode, String) {
        match &self.0 {
            KiroweenError::Validation { message, .. } => (StatusCode::BAD_REQUEST, message.clone()),
            KiroweenError::NotFound { kind, .. } => {
                (StatusCode::NOT_FOUND, kind.not_found_message().to_string())
            }
            err @ (KiroweenError::Database(_) | KiroweenError::Internal(_)) => {
                error!(error = %err, "Unexpected failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();
        (status, Json(ApiResponse::failure(message))).into_response()
    }
}

/// Fallback for paths no router matched.
pub async fn route_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure("Route not found")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiroween_core::models::ResourceKind;

    #[test]
    fn validation_maps_to_bad_request_with_message() {
        let err = ApiError(KiroweenError::validation("powerLevel", "Power level cannot exceed 10"));
        assert_eq!(
            err.classify(),
            (
                StatusCode::BAD_REQUEST,
                "Power level cannot exceed 10".to_string()
            )
        );
    }

    #[test]
    fn not_found_uses_resource_message() {
        let err = ApiError(KiroweenError::not_found(ResourceKind::Spell, "abc"));
        assert_eq!(
            err.classify(),
            (StatusCode::NOT_FOUND, "Spell lost in the void".to_string())
        );
    }

    #[test]
    fn unclassified_failures_hide_detail() {
        for err in [
            KiroweenError::Database("connection reset by peer".into()),
            KiroweenError::Internal("bug".into()),
        ] {
            let (status, message) = ApiError(err).classify();
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, INTERNAL_ERROR_MESSAGE);
        }
    }

    #[tokio::test]
    async fn response_body_is_the_error_envelope() {
        let response = ApiError(KiroweenError::Database("secret dsn".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": "Internal server error"})
        );
    }
}
