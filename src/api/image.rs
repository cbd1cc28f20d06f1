use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::extracted;
use super::{ApiError, ApiResponse, AppState};
use crate::models::image::ImageResponse;

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub prompt: String,
}

/// `POST /api/image`. An empty prompt is replaced by the configured default.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ImageResponse>>, ApiError> {
    let Json(payload) = extracted(payload)?;
    let response = state.image_service().generate(&payload.prompt).await;
    Ok(Json(ApiResponse::success(response)))
}
