use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for generative language model providers
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Generate a completion for a single prompt
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Model used for generation
    fn model(&self) -> &str;
}
