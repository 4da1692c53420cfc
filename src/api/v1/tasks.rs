//! Task lookup endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{TaskId, TaskRecord};

/// GET /api/v1/task/{task_id} - Current state of a URL scan
pub async fn get_task(
    State(state): State<AppState>,
    _key: RequireApiKey,
    Path(task_id): Path<String>,
) -> Result<Json<TaskRecord>, ApiError> {
    let record = state
        .task_repository
        .get(&TaskId::from(task_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(Json(record))
}
