//! Dashboard API endpoints.
//!
//! Handlers only map HTTP to [`DashboardService`] calls; ownership scoping
//! comes from the authenticated [`Principal`].
//!
//! [`DashboardService`]: crate::services::DashboardService

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::validation::{extracted, validate_entry_id, validate_page};
use super::{ApiError, ApiResponse, AppState, CleanupDto, DeletedEntryDto, SavedEntryDto};
use crate::domain::feed::FeedPage;
use crate::domain::{EntryKind, Principal};
use crate::services::{DashboardError, EntryDetail, ListQuery, SavePayload};

#[derive(Debug, Deserialize)]
pub struct KindQuery {
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::NotFound => Self::NotFound("Not found".to_string()),
            DashboardError::InvalidInput(msg) => Self::validation(msg),
            DashboardError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `GET /api/dashboard?type=all|search|image&page=1&q=`
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<FeedPage>>, ApiError> {
    let Query(query) = extracted(query)?;
    validate_page(query.page)?;

    let page = state
        .dashboard_service()
        .list(principal.id, &query)
        .await?;

    Ok(Json(ApiResponse::success(page)))
}

/// `POST /api/dashboard`
///
/// Body is `{"type": "search", "query", "results"}` or
/// `{"type": "image", "prompt", "images"}`.
pub async fn save_entry(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<SavedEntryDto>>, ApiError> {
    let Json(body) = extracted(body)?;
    let payload = SavePayload::from_value(body)?;

    let id = state
        .dashboard_service()
        .save(principal.id, payload)
        .await?;

    Ok(Json(ApiResponse::success(SavedEntryDto { id })))
}

/// `GET /api/dashboard/{id}?type=search|image`
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i32>, PathRejection>,
    query: Result<Query<KindQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<EntryDetail>>, ApiError> {
    let Path(id) = extracted(id)?;
    let Query(KindQuery { kind }) = extracted(query)?;
    let id = validate_entry_id(id)?;

    let detail = state
        .dashboard_service()
        .get(principal.id, id, kind)
        .await?;

    Ok(Json(ApiResponse::success(detail)))
}

/// `DELETE /api/dashboard/{id}?type=search|image`
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i32>, PathRejection>,
    query: Result<Query<KindQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<DeletedEntryDto>>, ApiError> {
    let Path(id) = extracted(id)?;
    let Query(KindQuery { kind }) = extracted(query)?;
    let id = validate_entry_id(id)?;

    state
        .dashboard_service()
        .delete(principal.id, id, kind)
        .await?;

    Ok(Json(ApiResponse::success(DeletedEntryDto { id, kind })))
}

/// `DELETE /api/dashboard/cleanup-all`
pub async fn cleanup_all(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ApiResponse<CleanupDto>>, ApiError> {
    let deleted = state
        .dashboard_service()
        .cleanup_empty(principal.id)
        .await?;

    Ok(Json(ApiResponse::success(CleanupDto { deleted })))
}
