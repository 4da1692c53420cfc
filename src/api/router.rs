//! HTTP router assembly

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::middleware::{
    logging_middleware, metrics_middleware, route_rate_limit_middleware,
    security_headers_middleware, RouteLimit, RouteScope,
};
use super::state::AppState;
use super::{health, keys, pages, v1};
use crate::config::CorsConfig;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Which surfaces the router mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterMode {
    /// Web page routes plus the JSON API
    #[default]
    Full,
    /// JSON API only
    ApiOnly,
}

/// Build the router with every route and middleware layer
pub fn create_router(
    state: AppState,
    mode: RouterMode,
    metrics: Option<PrometheusMetrics>,
) -> Router {
    let limited = |scope: RouteScope| {
        middleware::from_fn_with_state(
            RouteLimit::new(state.clone(), scope),
            route_rate_limit_middleware,
        )
    };

    let mut router = Router::new()
        .route(
            "/api/health",
            get(health::health_check).route_layer(limited(RouteScope::Health)),
        )
        .route(
            "/api/generate-key",
            post(keys::generate_key).route_layer(limited(RouteScope::GenerateKey)),
        )
        .nest("/api/v1", v1::create_v1_router(&state));

    if mode == RouterMode::Full {
        router = router
            .route(
                "/",
                get(pages::index).route_layer(limited(RouteScope::Index)),
            )
            .route(
                "/scam/",
                post(pages::detect_scam)
                    .route_layer(limited(RouteScope::Scam))
                    .layer(DefaultBodyLimit::max(state.config.uploads.max_bytes)),
            )
            .route(
                "/predict",
                post(pages::predict_url).route_layer(limited(RouteScope::Predict)),
            );
    }

    let cors = cors_layer(&state.config.cors);
    let metrics_path = state.config.metrics.path.clone();

    let mut router = router
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m, &metrics_path));
    }

    router
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
