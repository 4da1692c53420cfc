//! URL and content scan endpoints

use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, ContentScanResponse, OptionalJson, ScanContentRequest, ScanStarted, ScanUrlRequest,
};
use crate::domain::classification::has_http_scheme;
use crate::domain::{TaskId, TaskRecord};
use crate::infrastructure::task::ScanJob;

/// Longest content accepted by the content scan, in characters
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// POST /api/v1/scan-url - Queue a background URL scan
pub async fn scan_url(
    State(state): State<AppState>,
    RequireApiKey(key): RequireApiKey,
    OptionalJson(body): OptionalJson<ScanUrlRequest>,
) -> Result<Json<ScanStarted>, ApiError> {
    let url = body
        .and_then(|b| b.url)
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;
    let url = validate_url(&url)?;

    let record = state
        .task_repository
        .create(TaskRecord::processing(TaskId::generate(), url.clone()))
        .await?;
    let task_id = record.task_id;

    let job = ScanJob {
        task_id: task_id.clone(),
        url: url.clone(),
    };

    if let Err(e) = state.task_queue.enqueue(job) {
        if let Err(store_err) = state.task_repository.fail(&task_id, e.to_string()).await {
            warn!(task_id = %task_id, error = %store_err, "Failed to mark unqueued task");
        }
        return Err(e.into());
    }

    info!(task_id = %task_id, url = %url, owner = %key.owner.name, "URL scan queued");

    Ok(Json(ScanStarted::new(task_id)))
}

/// POST /api/v1/scan-content - Classify text synchronously
pub async fn scan_content(
    State(state): State<AppState>,
    RequireApiKey(key): RequireApiKey,
    OptionalJson(body): OptionalJson<ScanContentRequest>,
) -> Result<Json<ContentScanResponse>, ApiError> {
    let content = body
        .and_then(|b| b.content)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("Content is required"))?;

    let content_length = content.chars().count();
    if content_length > MAX_CONTENT_CHARS {
        return Err(ApiError::bad_request(format!(
            "Content too long (max {} characters)",
            MAX_CONTENT_CHARS
        )));
    }

    let result = state
        .classifier
        .classify_content(&content)
        .await
        .map_err(|e| {
            warn!(owner = %key.owner.name, error = %e, "Content scan failed");
            ApiError::internal(format!("Analysis failed: {}", e))
        })?;

    info!(owner = %key.owner.name, content_length, "Content scan completed");

    Ok(Json(ContentScanResponse::completed(result, content_length)))
}

/// Trim and check a submitted URL
fn validate_url(raw: &str) -> Result<String, ApiError> {
    let url = raw.trim();

    if !has_http_scheme(url) || reqwest::Url::parse(url).is_err() {
        return Err(ApiError::bad_request("Invalid URL format"));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_trims() {
        assert_eq!(
            validate_url("  https://example.com/login \n").unwrap(),
            "https://example.com/login"
        );
    }

    #[test]
    fn test_validate_url_rejects_other_schemes() {
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("").is_err());
    }

    #[test]
    fn test_validate_url_rejects_unparsable() {
        let err = validate_url("http://").unwrap_err();
        assert_eq!(err.response.error, "Invalid URL format");
        assert!(validate_url("https://exa mple.com").is_err());
    }
}
