use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::extracted;
use super::{ApiError, ApiResponse, AppState};
use crate::models::search::SearchResponse;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default, alias = "q")]
    pub query: String,
}

/// `POST /api/search`. Always answers, falling back to canned results.
pub async fn search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SearchResponse>>, ApiError> {
    let Json(payload) = extracted(payload)?;
    let response = state.search_service().search(&payload.query).await;
    Ok(Json(ApiResponse::success(response)))
}
