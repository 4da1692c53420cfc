//! API middleware components

pub mod auth;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod security;

pub use auth::RequireApiKey;
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use rate_limit::{route_rate_limit_middleware, RouteLimit, RouteScope};
pub use security::security_headers_middleware;
