//! Usage statistics endpoint

use axum::{extract::State, Json};

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::{ApiError, StatsResponse};

/// GET /api/v1/stats - Task counts and registered keys
pub async fn get_stats(
    State(state): State<AppState>,
    _key: RequireApiKey,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.task_repository.stats().await?;
    let active_api_keys = state.api_key_service.active_keys().await?;

    Ok(Json(StatsResponse::new(stats, active_api_keys)))
}
