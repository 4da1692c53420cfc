//! API key authentication extractor

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, HeaderMap, Uri},
};
use serde::Deserialize;
use tracing::{debug, warn};

use super::rate_limit::rate_limit_exceeded;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::api_key::AuthenticatedKey;

pub const API_KEY_HEADER: &str = "x-api-key";

const UNAUTHORIZED_MESSAGE: &str = "Valid API key required";

/// Extractor that requires a registered API key
///
/// The key is read from the `X-API-Key` header, or from the `api_key`
/// query parameter when the header is absent. When key quotas are
/// enforced, the key's own quota is charged here.
#[derive(Debug, Clone)]
pub struct RequireApiKey(pub AuthenticatedKey);

#[derive(Debug, Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = extract_api_key(&parts.headers, parts.uri.query())
            .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MESSAGE))?;

        let key = state
            .api_key_service
            .authenticate(&presented)
            .await?
            .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MESSAGE))?;

        debug!(owner = %key.owner.name, "API key accepted");

        if state.config.rate_limits.enforce_key_quotas {
            let quota = key.owner.rate_limit.to_rate_limit_config();
            let result = state
                .rate_limiter
                .check_and_record(&format!("key:{}", key.digest), &quota)
                .await;

            if !result.allowed {
                warn!(owner = %key.owner.name, quota = %key.owner.rate_limit, "API key quota exceeded");
                return Err(rate_limit_exceeded(&result));
            }
        }

        Ok(RequireApiKey(key))
    }
}

/// Header value first, then the query parameter; blank values count as absent
fn extract_api_key(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    let from_header = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(key) = from_header {
        return Some(key.to_string());
    }

    let uri: Uri = format!("/?{}", query?).parse().ok()?;
    let Query(params) = Query::<ApiKeyQuery>::try_from_uri(&uri).ok()?;

    params
        .api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(
            extract_api_key(&headers("demo-key-123"), None).as_deref(),
            Some("demo-key-123")
        );
    }

    #[test]
    fn test_extract_from_query() {
        assert_eq!(
            extract_api_key(&HeaderMap::new(), Some("api_key=admin-key-456&x=1")).as_deref(),
            Some("admin-key-456")
        );
    }

    #[test]
    fn test_query_value_is_percent_decoded() {
        assert_eq!(
            extract_api_key(&HeaderMap::new(), Some("api_key=a%2Bb")).as_deref(),
            Some("a+b")
        );
    }

    #[test]
    fn test_header_takes_precedence() {
        assert_eq!(
            extract_api_key(&headers("from-header"), Some("api_key=from-query")).as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_missing_or_blank_key() {
        assert!(extract_api_key(&HeaderMap::new(), None).is_none());
        assert!(extract_api_key(&HeaderMap::new(), Some("other=1")).is_none());
        assert!(extract_api_key(&HeaderMap::new(), Some("api_key=")).is_none());
        assert!(extract_api_key(&headers("  "), None).is_none());
    }
}
