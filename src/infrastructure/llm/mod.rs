//! LLM provider implementations

mod gemini;
mod http_client;

pub use gemini::{GeminiConfig, GeminiProvider, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
pub use http_client::{HttpClient, HttpClientTrait};
