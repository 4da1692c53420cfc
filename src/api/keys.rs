//! API key self-service endpoint

use axum::{extract::State, Json};

use super::state::AppState;
use super::types::{ApiError, GeneratedKeyResponse};
use crate::domain::ApiKeyOwner;

/// POST /api/generate-key - Mint and register a new key
pub async fn generate_key(
    State(state): State<AppState>,
) -> Result<Json<GeneratedKeyResponse>, ApiError> {
    let key = state
        .api_key_service
        .generate(ApiKeyOwner::generated())
        .await?;

    Ok(Json(GeneratedKeyResponse::new(key)))
}
