//! Domain layer - Core entities, prompts and seams

pub mod api_key;
pub mod classification;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod rate_limit;
pub mod task;

pub use api_key::{ApiKeyOwner, ApiKeyRepository, QuotaPeriod, RateQuota};
pub use classification::{Classifier, UrlCategory, UrlVerdict};
pub use error::DomainError;
pub use extraction::{ExtractionError, TextExtractor, UploadKind};
pub use llm::{FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Usage};
pub use rate_limit::RateLimitConfig;
pub use task::{TaskId, TaskRecord, TaskRepository, TaskStats, TaskStatus};
