//! API key domain types

mod entity;
mod repository;

pub use entity::{ApiKeyOwner, QuotaParseError, QuotaPeriod, RateQuota};
pub use repository::ApiKeyRepository;
