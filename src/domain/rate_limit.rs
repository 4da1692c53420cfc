//! Rate limit windows

use serde::{Deserialize, Serialize};

/// Request limits over the minute, hour and day windows
///
/// `u32::MAX` disables a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub requests_per_hour: u32,
    pub requests_per_day: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl RateLimitConfig {
    /// Limits for all three windows; `u32::MAX` disables a window
    pub fn new(per_minute: u32, per_hour: u32, per_day: u32) -> Self {
        Self {
            requests_per_minute: per_minute,
            requests_per_hour: per_hour,
            requests_per_day: per_day,
        }
    }

    /// No window enforced
    pub fn unlimited() -> Self {
        Self::new(u32::MAX, u32::MAX, u32::MAX)
    }

    pub fn per_minute(requests: u32) -> Self {
        Self::unlimited().with_per_minute(requests)
    }

    pub fn per_hour(requests: u32) -> Self {
        Self::unlimited().with_per_hour(requests)
    }

    pub fn per_day(requests: u32) -> Self {
        Self {
            requests_per_day: requests,
            ..Self::unlimited()
        }
    }

    pub fn with_per_minute(mut self, requests: u32) -> Self {
        self.requests_per_minute = requests;
        self
    }

    pub fn with_per_hour(mut self, requests: u32) -> Self {
        self.requests_per_hour = requests;
        self
    }

    pub fn is_unlimited(&self) -> bool {
        *self == Self::unlimited()
    }
}
