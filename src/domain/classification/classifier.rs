use std::sync::Arc;

use tracing::{debug, warn};

use super::{content_prompt, url_prompt, UrlCategory};
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

/// Returned when the model answers a content prompt with nothing
pub const CONTENT_FALLBACK: &str = "Classification failed.";

/// Returned when the model answers a URL prompt with nothing
pub const URL_FALLBACK: &str = "Detection failed.";

/// Whether `url` uses an `http://` or `https://` scheme (case-sensitive)
pub fn has_http_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Result of classifying a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlVerdict {
    /// The model's answer as returned (trimmed)
    pub raw: String,
    /// The answer mapped onto a known class, when it is one
    pub category: Option<UrlCategory>,
}

impl UrlVerdict {
    fn from_answer(raw: String) -> Self {
        let category = UrlCategory::parse(&raw);
        Self { raw, category }
    }
}

/// Builds classification prompts and delegates them to an LLM provider
#[derive(Debug, Clone)]
pub struct Classifier {
    provider: Arc<dyn LlmProvider>,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl Classifier {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Sampling temperature sent with every prompt; provider default when unset
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Classify a message as legitimate or scam
    pub async fn classify_content(&self, text: &str) -> Result<String, DomainError> {
        debug!(content_chars = text.chars().count(), "Classifying content");

        let answer = self.generate(content_prompt(text)).await?;
        Ok(answer.unwrap_or_else(|| CONTENT_FALLBACK.to_string()))
    }

    /// Classify a URL into one of the security classes
    pub async fn classify_url(&self, url: &str) -> Result<UrlVerdict, DomainError> {
        debug!(url = %url, "Classifying URL");

        let answer = self.generate(url_prompt(url)).await?;
        let verdict = UrlVerdict::from_answer(answer.unwrap_or_else(|| URL_FALLBACK.to_string()));

        if verdict.category.is_none() {
            warn!(url = %url, answer = %verdict.raw, "Model answer is not a known URL class");
        }

        Ok(verdict)
    }

    async fn generate(&self, prompt: String) -> Result<Option<String>, DomainError> {
        let mut request = LlmRequest::builder().prompt(prompt);
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }
        if let Some(max_output_tokens) = self.max_output_tokens {
            request = request.max_output_tokens(max_output_tokens);
        }

        debug!(
            provider = self.provider.provider_name(),
            model = self.provider.model(),
            "Sending prompt"
        );

        let response = self.provider.generate(request.build()).await?;
        Ok(response.content().map(str::to_string))
    }
}
