//! Authenticated v1 scan API

pub mod scan;
pub mod stats;
pub mod tasks;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::middleware::{route_rate_limit_middleware, RouteLimit, RouteScope};
use super::state::AppState;

/// Create v1 API router, each route behind its own rate limit scope
pub fn create_v1_router(state: &AppState) -> Router<AppState> {
    let limited = |scope: RouteScope| {
        middleware::from_fn_with_state(
            RouteLimit::new(state.clone(), scope),
            route_rate_limit_middleware,
        )
    };

    Router::new()
        .route(
            "/scan-url",
            post(scan::scan_url).route_layer(limited(RouteScope::ScanUrl)),
        )
        .route(
            "/scan-content",
            post(scan::scan_content).route_layer(limited(RouteScope::ScanContent)),
        )
        .route(
            "/task/{task_id}",
            get(tasks::get_task).route_layer(limited(RouteScope::Task)),
        )
        .route(
            "/stats",
            get(stats::get_stats).route_layer(limited(RouteScope::Stats)),
        )
}
