//! Sliding window rate limiter
//!
//! Keeps the timestamps of accepted requests per key and counts them over
//! the minute, hour and day windows. Each key only holds timestamps inside
//! the longest window its limits configure.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::domain::RateLimitConfig;

/// Result of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Remaining requests in the tightest window
    pub remaining: u32,
    /// Limit of the tightest window
    pub limit: u32,
    /// Seconds until the tightest window frees a slot
    pub reset_in_seconds: u64,
    /// Which limit was hit (if any)
    pub limit_type: Option<LimitType>,
}

/// Type of rate limit that was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitType {
    PerMinute,
    PerHour,
    PerDay,
}

impl LimitType {
    fn window(&self) -> Duration {
        match self {
            Self::PerMinute => Duration::from_secs(60),
            Self::PerHour => Duration::from_secs(3600),
            Self::PerDay => Duration::from_secs(86400),
        }
    }

    /// Human readable window name, e.g. "10 per 1 minute"
    pub fn describe(&self, limit: u32) -> String {
        match self {
            Self::PerMinute => format!("{} per 1 minute", limit),
            Self::PerHour => format!("{} per 1 hour", limit),
            Self::PerDay => format!("{} per 1 day", limit),
        }
    }
}

impl std::fmt::Display for LimitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerMinute => write!(f, "per_minute"),
            Self::PerHour => write!(f, "per_hour"),
            Self::PerDay => write!(f, "per_day"),
        }
    }
}

/// Accepted request times for one key
#[derive(Debug, Default)]
struct KeyRecord {
    /// Longest window configured the last time the key was charged
    window: Duration,
    timestamps: Vec<Instant>,
}

impl KeyRecord {
    fn prune(&mut self, now: Instant) {
        let cutoff = now.checked_sub(self.window).unwrap_or(now);
        self.timestamps.retain(|t| *t >= cutoff);
    }
}

#[derive(Debug)]
pub struct RateLimiter {
    records: Arc<RwLock<HashMap<String, KeyRecord>>>,
    cleanup_interval: Duration,
    last_cleanup: Arc<RwLock<Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            cleanup_interval: Duration::from_secs(300),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    /// Check and record in one operation; rejected requests are not recorded
    pub async fn check_and_record(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        self.maybe_cleanup().await;

        let Some(window) = longest_window(config) else {
            return calculate_limits(None, config, Instant::now());
        };

        let now = Instant::now();
        let mut records = self.records.write().await;

        if let Some(record) = records.get_mut(key) {
            record.window = window;
            record.prune(now);
        }

        let result = calculate_limits(
            records.get(key).map(|r| r.timestamps.as_slice()),
            config,
            now,
        );

        if result.allowed {
            let record = records.entry(key.to_string()).or_default();
            record.window = window;
            record.timestamps.push(now);
        }

        result
    }

    async fn maybe_cleanup(&self) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.cleanup_interval
        };

        if !should_cleanup {
            return;
        }

        *self.last_cleanup.write().await = Instant::now();

        let now = Instant::now();
        let mut records = self.records.write().await;
        for record in records.values_mut() {
            record.prune(now);
        }
        records.retain(|_, record| !record.timestamps.is_empty());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest window with a finite limit; `None` when the config is unlimited
fn longest_window(config: &RateLimitConfig) -> Option<Duration> {
    if config.is_unlimited() {
        return None;
    }

    [
        (LimitType::PerDay, config.requests_per_day),
        (LimitType::PerHour, config.requests_per_hour),
        (LimitType::PerMinute, config.requests_per_minute),
    ]
    .into_iter()
    .find(|(_, limit)| *limit != u32::MAX)
    .map(|(limit_type, _)| limit_type.window())
}

fn calculate_limits(
    timestamps: Option<&[Instant]>,
    config: &RateLimitConfig,
    now: Instant,
) -> RateLimitResult {
    let windows = [
        (LimitType::PerMinute, config.requests_per_minute),
        (LimitType::PerHour, config.requests_per_hour),
        (LimitType::PerDay, config.requests_per_day),
    ];
    let timestamps = timestamps.unwrap_or_default();

    let mut tightest: Option<RateLimitResult> = None;

    for (limit_type, limit) in windows {
        if limit == u32::MAX {
            continue;
        }

        let window = limit_type.window();
        let start = now.checked_sub(window).unwrap_or(now);
        let in_window: Vec<&Instant> = timestamps.iter().filter(|t| **t >= start).collect();
        let count = in_window.len() as u32;

        let reset_in_seconds = in_window
            .iter()
            .min()
            .map(|oldest| window.as_secs().saturating_sub(now.duration_since(**oldest).as_secs()))
            .unwrap_or(window.as_secs());

        if count >= limit {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                limit,
                reset_in_seconds: reset_in_seconds.max(1),
                limit_type: Some(limit_type),
            };
        }

        let remaining = limit - count - 1;
        if tightest.as_ref().is_none_or(|t| remaining < t.remaining) {
            tightest = Some(RateLimitResult {
                allowed: true,
                remaining,
                limit,
                reset_in_seconds,
                limit_type: None,
            });
        }
    }

    tightest.unwrap_or(RateLimitResult {
        allowed: true,
        remaining: u32::MAX,
        limit: u32::MAX,
        reset_in_seconds: 0,
        limit_type: None,
    })
}
