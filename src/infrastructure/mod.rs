//! Infrastructure layer - External service implementations

pub mod api_key;
pub mod extraction;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod rate_limit;
pub mod task;
