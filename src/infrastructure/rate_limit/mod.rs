//! Sliding window rate limiting

mod limiter;

pub use limiter::{LimitType, RateLimitResult, RateLimiter};
