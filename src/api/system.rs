use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthDto};

/// `GET /api/health`
///
/// Reports `ok` once the database answers a ping, 503 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.store().ping().await {
        Ok(()) => Json(ApiResponse::success(HealthDto { status: "ok" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::success(HealthDto {
                    status: "unavailable",
                })),
            )
                .into_response()
        }
    }
}
