//! Google Gemini provider (`generateContent` REST API)

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse, Usage};
use crate::infrastructure::observability::{record_llm_request, LlmRequestMetricParams};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Gemini provider configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    /// Config for the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API endpoint, e.g. to point at a mock server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Gemini API provider
#[derive(Debug)]
pub struct GeminiProvider<C: HttpClientTrait> {
    client: C,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl<C: HttpClientTrait> GeminiProvider<C> {
    /// Create a new Gemini provider
    pub fn new(client: C, config: GeminiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.filter(|key| !key.trim().is_empty()),
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Whether an API key is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(&self, request: &LlmRequest) -> serde_json::Value {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: build_generation_config(request),
        };

        serde_json::to_value(body).unwrap_or_default()
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let response: GenerateContentResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("gemini", format!("Failed to parse response: {}", e))
        })?;

        let model = response.model_version.unwrap_or_else(|| self.model.clone());

        let Some(candidate) = response.candidates.into_iter().next() else {
            if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(DomainError::provider(
                    "gemini",
                    format!("Prompt blocked: {}", reason),
                ));
            }
            return Ok(LlmResponse::new(model, None));
        };

        let finish_reason = candidate.finish_reason.as_deref().map(parse_finish_reason);

        if finish_reason == Some(FinishReason::ContentFilter) {
            return Err(DomainError::provider(
                "gemini",
                "Response blocked by safety filters",
            ));
        }

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let mut llm_response = LlmResponse::new(model, Some(text).filter(|t| !t.is_empty()));

        if let Some(reason) = finish_reason {
            llm_response = llm_response.with_finish_reason(reason);
        }

        if let Some(usage) = response.usage_metadata {
            llm_response = llm_response.with_usage(Usage::new(
                usage.prompt_token_count,
                usage.candidates_token_count,
            ));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for GeminiProvider<C> {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::configuration("Gemini API key is not configured"))?;

        let url = self.generate_content_url();
        let body = self.build_request(&request);
        let headers = vec![
            ("x-goog-api-key", api_key),
            ("Content-Type", "application/json"),
        ];

        debug!(
            model = %self.model,
            prompt_len = request.prompt.len(),
            "Sending request to Gemini API"
        );

        let start = Instant::now();
        let result = self
            .client
            .post_json(&url, headers, &body)
            .await
            .and_then(|json| self.parse_response(json));

        let usage = result.as_ref().ok().and_then(|r| r.usage.as_ref());
        record_llm_request(LlmRequestMetricParams {
            provider: self.provider_name(),
            model: &self.model,
            duration: start.elapsed(),
            success: result.is_ok(),
            input_tokens: usage.map(|u| u.prompt_tokens as u64),
            output_tokens: usage.map(|u| u.completion_tokens as u64),
        });

        result
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn build_generation_config(request: &LlmRequest) -> Option<GenerationConfig> {
    if request.temperature.is_none() && request.max_output_tokens.is_none() {
        return None;
    }

    Some(GenerationConfig {
        temperature: request.temperature,
        max_output_tokens: request.max_output_tokens,
    })
}

fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => FinishReason::ContentFilter,
        _ => FinishReason::Other,
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use crate::infrastructure::llm::HttpClient;

    const TEST_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent";

    fn wire_client() -> HttpClient {
        HttpClient::with_timeout(std::time::Duration::from_secs(5)).unwrap()
    }

    fn provider(client: MockHttpClient) -> GeminiProvider<MockHttpClient> {
        GeminiProvider::new(client, GeminiConfig::new("test-api-key"))
    }

    #[tokio::test]
    async fn test_gemini_generate() {
        let mock_response = serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "phish" }, { "text": "ing\n" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 120,
                "candidatesTokenCount": 2,
                "totalTokenCount": 122
            },
            "modelVersion": "gemini-2.5-flash-preview-05-20"
        });

        let provider = provider(MockHttpClient::new().with_response(TEST_URL, mock_response));
        let response = provider.generate(LlmRequest::new("Classify")).await.unwrap();

        assert_eq!(response.content(), Some("phishing"));
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.model, "gemini-2.5-flash-preview-05-20");

        let usage = response.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 120);
        assert_eq!(usage.completion_tokens, 2);
    }

    #[tokio::test]
    async fn test_gemini_request_shape() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({ "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }] }),
        );
        let provider = provider(client);

        let request = LlmRequest::builder().prompt("Hello").temperature(0.1).build();
        provider.generate(request).await.unwrap();

        let (url, headers, body) = provider.client.requests().remove(0);
        assert_eq!(url, TEST_URL);
        assert!(headers.contains(&("x-goog-api-key".to_string(), "test-api-key".to_string())));
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[tokio::test]
    async fn test_gemini_omits_generation_config_by_default() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({ "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }] }),
        );
        let provider = provider(client);

        provider.generate(LlmRequest::new("Hello")).await.unwrap();

        let (_, _, body) = provider.client.requests().remove(0);
        assert!(body.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_gemini_empty_candidates() {
        let provider = provider(
            MockHttpClient::new().with_response(TEST_URL, serde_json::json!({ "candidates": [] })),
        );

        let response = provider.generate(LlmRequest::new("Classify")).await.unwrap();
        assert_eq!(response.content(), None);
    }

    #[tokio::test]
    async fn test_gemini_blocked_prompt() {
        let provider = provider(MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } }),
        ));

        let err = provider.generate(LlmRequest::new("Classify")).await.unwrap_err();
        assert!(err.to_string().contains("Prompt blocked: SAFETY"));
    }

    #[tokio::test]
    async fn test_gemini_safety_finish_reason() {
        let provider = provider(MockHttpClient::new().with_response(
            TEST_URL,
            serde_json::json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
        ));

        let err = provider.generate(LlmRequest::new("Classify")).await.unwrap_err();
        assert!(matches!(err, DomainError::Provider { .. }));
    }

    #[tokio::test]
    async fn test_gemini_error_handling() {
        let provider = provider(MockHttpClient::new().with_error(TEST_URL, "API key invalid"));

        let result = provider.generate(LlmRequest::new("Classify")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_gemini_without_api_key() {
        let config = GeminiConfig {
            api_key: Some("  ".to_string()),
            ..GeminiConfig::new("unused")
        };
        let provider = GeminiProvider::new(MockHttpClient::new(), config);

        assert!(!provider.is_configured());
        let err = provider.generate(LlmRequest::new("Classify")).await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(provider.client.requests().is_empty());
    }

    #[test]
    fn test_empty_api_key_is_unconfigured() {
        let provider = GeminiProvider::new(MockHttpClient::new(), GeminiConfig::new(""));

        assert!(!provider.is_configured());
    }

    #[tokio::test]
    async fn test_gemini_over_http_wire() {
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "wire-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "benign" }] }, "finishReason": "STOP" }]
            })))
            .mount(&server)
            .await;

        let config = GeminiConfig::new("wire-key")
            .with_model("gemini-test")
            .with_base_url(format!("{}/", server.uri()));
        let provider = GeminiProvider::new(wire_client(), config);

        let response = provider.generate(LlmRequest::new("Classify")).await.unwrap();
        assert_eq!(response.content(), Some("benign"));
    }

    #[tokio::test]
    async fn test_gemini_http_error_status() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let config = GeminiConfig::new("wire-key").with_base_url(server.uri());
        let provider = GeminiProvider::new(wire_client(), config);

        let err = provider.generate(LlmRequest::new("Classify")).await.unwrap_err();
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
