//! Per-route rate limiting keyed by client address

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::config::RateLimitSettings;
use crate::domain::{DomainError, RateLimitConfig};
use crate::infrastructure::rate_limit::RateLimitResult;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// The bucket a route counts against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteScope {
    Index,
    Health,
    GenerateKey,
    Scam,
    Predict,
    ScanUrl,
    ScanContent,
    Task,
    Stats,
}

impl RouteScope {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Health => "health",
            Self::GenerateKey => "generate_key",
            Self::Scam => "scam",
            Self::Predict => "predict",
            Self::ScanUrl => "scan_url",
            Self::ScanContent => "scan_content",
            Self::Task => "task",
            Self::Stats => "stats",
        }
    }

    /// Limit for this scope; routes without their own limit get the default
    pub fn limit(&self, settings: &RateLimitSettings) -> RateLimitConfig {
        match self {
            Self::Scam => RateLimitConfig::per_minute(settings.scam_per_minute),
            Self::Predict => RateLimitConfig::per_minute(settings.predict_per_minute),
            Self::ScanUrl => RateLimitConfig::per_minute(settings.scan_url_per_minute),
            Self::ScanContent => RateLimitConfig::per_minute(settings.scan_content_per_minute),
            Self::Index | Self::Health | Self::GenerateKey | Self::Task | Self::Stats => {
                RateLimitConfig::per_minute(settings.default_per_minute)
                    .with_per_hour(settings.default_per_hour)
            }
        }
    }
}

/// Middleware state: the app plus the scope of the wrapped route
#[derive(Clone)]
pub struct RouteLimit {
    pub state: AppState,
    pub scope: RouteScope,
}

impl RouteLimit {
    /// Limit requests to `scope` using the configured policy
    pub fn new(state: AppState, scope: RouteScope) -> Self {
        Self { state, scope }
    }
}

pub async fn route_rate_limit_middleware(
    State(limit): State<RouteLimit>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let settings = &limit.state.config.rate_limits;
    if !settings.enabled {
        return next.run(request).await;
    }

    let client = client_address(&request);
    let key = format!("{}:{}", limit.scope.name(), client);
    let config = limit.scope.limit(settings);

    let result = limit.state.rate_limiter.check_and_record(&key, &config).await;

    if !result.allowed {
        warn!(
            scope = limit.scope.name(),
            client = %client,
            retry_after_secs = result.reset_in_seconds,
            "Route rate limit exceeded"
        );
        return rate_limit_exceeded(&result).into_response();
    }

    let mut response = next.run(request).await;
    apply_rate_limit_headers(&mut response, &result);
    response
}

/// Client address: first `X-Forwarded-For` entry, then the peer address
pub fn client_address<B>(request: &Request<B>) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 429 error for a rejected check
pub fn rate_limit_exceeded(result: &RateLimitResult) -> ApiError {
    let description = result
        .limit_type
        .map(|limit_type| limit_type.describe(result.limit))
        .unwrap_or_else(|| result.limit.to_string());

    ApiError::from(DomainError::rate_limited(description, result.reset_in_seconds))
        .with_header(X_RATELIMIT_LIMIT, result.limit)
        .with_header(X_RATELIMIT_REMAINING, 0)
}

fn apply_rate_limit_headers(response: &mut Response, result: &RateLimitResult) {
    if result.limit == u32::MAX {
        return;
    }

    let headers = response.headers_mut();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(result.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(result.remaining));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_limits() {
        let settings = RateLimitSettings::default();

        assert_eq!(
            RouteScope::Scam.limit(&settings),
            RateLimitConfig::per_minute(10)
        );
        assert_eq!(
            RouteScope::ScanContent.limit(&settings),
            RateLimitConfig::per_minute(30)
        );
        assert_eq!(
            RouteScope::Stats.limit(&settings),
            RateLimitConfig::per_minute(100).with_per_hour(1000)
        );
    }

    #[test]
    fn test_client_address_prefers_forwarded_for() {
        let request = Request::builder()
            .header("x-forwarded-for", " 203.0.113.7 , 10.0.0.1")
            .body(())
            .unwrap();

        assert_eq!(client_address(&request), "203.0.113.7");
    }

    #[test]
    fn test_client_address_uses_peer() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 5555))));

        assert_eq!(client_address(&request), "192.0.2.1");
    }

    #[test]
    fn test_client_address_unknown() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(client_address(&request), "unknown");
    }

    #[test]
    fn test_rate_limit_exceeded_response() {
        let result = RateLimitResult {
            allowed: false,
            remaining: 0,
            limit: 10,
            reset_in_seconds: 30,
            limit_type: Some(crate::infrastructure::rate_limit::LimitType::PerMinute),
        };

        let err = rate_limit_exceeded(&result);

        assert_eq!(err.status, axum::http::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.response.error, "Rate limit exceeded: 10 per 1 minute");
        assert_eq!(err.headers.get("retry-after").unwrap(), "30");
        assert_eq!(err.headers.get(X_RATELIMIT_LIMIT).unwrap(), "10");
        assert_eq!(err.headers.get(X_RATELIMIT_REMAINING).unwrap(), "0");
    }
}
