//! API key owner metadata and nominal quotas

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::rate_limit::RateLimitConfig;

/// Period a quota is counted over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaPeriod {
    Minute,
    Hour,
    Day,
}

impl QuotaPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
        }
    }
}

/// Error parsing a `<requests>/<period>` quota string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid rate quota '{0}': expected '<requests>/<minute|hour|day>'")]
pub struct QuotaParseError(String);

/// A nominal request quota such as `100/hour`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RateQuota {
    pub requests: u32,
    pub period: QuotaPeriod,
}

impl RateQuota {
    pub fn new(requests: u32, period: QuotaPeriod) -> Self {
        Self { requests, period }
    }

    pub fn per_hour(requests: u32) -> Self {
        Self::new(requests, QuotaPeriod::Hour)
    }

    /// Limiter configuration enforcing this quota alone
    pub fn to_rate_limit_config(&self) -> RateLimitConfig {
        match self.period {
            QuotaPeriod::Minute => RateLimitConfig::per_minute(self.requests),
            QuotaPeriod::Hour => RateLimitConfig::per_hour(self.requests),
            QuotaPeriod::Day => RateLimitConfig::per_day(self.requests),
        }
    }
}

impl FromStr for RateQuota {
    type Err = QuotaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || QuotaParseError(s.to_string());

        let (requests, period) = s.trim().split_once('/').ok_or_else(err)?;
        let requests: u32 = requests.trim().parse().map_err(|_| err())?;

        let period = match period.trim().to_ascii_lowercase().as_str() {
            "minute" | "min" | "m" => QuotaPeriod::Minute,
            "hour" | "h" => QuotaPeriod::Hour,
            "day" | "d" => QuotaPeriod::Day,
            _ => return Err(err()),
        };

        Ok(Self { requests, period })
    }
}

impl TryFrom<String> for RateQuota {
    type Error = QuotaParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RateQuota> for String {
    fn from(quota: RateQuota) -> Self {
        quota.to_string()
    }
}

impl fmt::Display for RateQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.requests, self.period.as_str())
    }
}

/// Metadata recorded for each registered key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyOwner {
    pub name: String,
    pub rate_limit: RateQuota,
}

impl ApiKeyOwner {
    /// Owner with a display name and nominal quota
    pub fn new(name: impl Into<String>, rate_limit: RateQuota) -> Self {
        Self {
            name: name.into(),
            rate_limit,
        }
    }

    /// Owner record given to keys minted through the API
    pub fn generated() -> Self {
        Self::new("Generated User", RateQuota::per_hour(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quota() {
        assert_eq!("100/hour".parse::<RateQuota>().unwrap(), RateQuota::per_hour(100));
        assert_eq!(
            "10/minute".parse::<RateQuota>().unwrap(),
            RateQuota::new(10, QuotaPeriod::Minute)
        );
        assert_eq!(
            " 5 / Day ".parse::<RateQuota>().unwrap(),
            RateQuota::new(5, QuotaPeriod::Day)
        );
    }

    #[test]
    fn test_parse_quota_errors() {
        assert!("100".parse::<RateQuota>().is_err());
        assert!("many/hour".parse::<RateQuota>().is_err());
        assert!("100/week".parse::<RateQuota>().is_err());
        assert!("-1/hour".parse::<RateQuota>().is_err());
    }

    #[test]
    fn test_quota_display_round_trips_through_serde() {
        let owner = ApiKeyOwner::generated();
        let json = serde_json::to_string(&owner).unwrap();

        assert_eq!(json, r#"{"name":"Generated User","rate_limit":"100/hour"}"#);
        assert_eq!(serde_json::from_str::<ApiKeyOwner>(&json).unwrap(), owner);
    }

    #[test]
    fn test_quota_to_rate_limit_config() {
        let config = RateQuota::per_hour(100).to_rate_limit_config();
        assert_eq!(config.requests_per_hour, 100);
        assert_eq!(config.requests_per_minute, u32::MAX);
    }
}
