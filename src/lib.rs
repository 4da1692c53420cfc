//! ScanWitch API
//!
//! Scam text and malicious URL detection backed by a generative model:
//! - Document upload and URL check web page
//! - API-key protected JSON API with background URL scans
//! - Per-route and per-key rate limiting

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::{Classifier, LlmProvider, TaskRepository};
use infrastructure::{
    api_key::{ApiKeyGenerator, ApiKeyService, InMemoryApiKeyRepository},
    llm::{GeminiConfig, GeminiProvider, HttpClient},
    rate_limit::RateLimiter,
    task::{spawn_retention_sweeper, InMemoryTaskRepository, TaskQueue, TaskQueueConfig},
};
use tracing::{info, warn};

/// Create application state with explicit configuration
///
/// Spawns the scan workers, so it must run inside a tokio runtime.
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let llm_provider = create_llm_provider(config)?;
    let classifier = Arc::new(
        Classifier::new(llm_provider)
            .with_temperature(config.gemini.temperature)
            .with_max_output_tokens(config.gemini.max_output_tokens),
    );

    let api_key_repository = if config.api_keys.seed_demo_keys {
        info!("Seeding demo API keys");
        InMemoryApiKeyRepository::with_demo_keys()
    } else {
        InMemoryApiKeyRepository::new()
    };

    let mut generator = ApiKeyGenerator::new();
    if let Some(prefix) = &config.api_keys.prefix {
        generator = generator.with_prefix(prefix.clone());
    }
    let api_key_service =
        Arc::new(ApiKeyService::new(Arc::new(api_key_repository)).with_generator(generator));

    let task_repository: Arc<dyn TaskRepository> = Arc::new(InMemoryTaskRepository::new());
    let task_queue = TaskQueue::start(
        TaskQueueConfig {
            concurrency: config.worker.concurrency,
            queue_capacity: config.worker.queue_capacity,
            processing_delay: Duration::from_millis(config.worker.processing_delay_ms),
        },
        classifier.clone(),
        task_repository.clone(),
    );

    if let Some(secs) = config.worker.task_retention_secs {
        info!(retention_secs = secs, "Finished task retention enabled");
        spawn_retention_sweeper(task_repository.clone(), Duration::from_secs(secs));
    }

    Ok(AppState {
        config: Arc::new(config.clone()),
        classifier,
        api_key_service,
        task_repository,
        task_queue,
        rate_limiter: Arc::new(RateLimiter::new()),
    })
}

fn create_llm_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let settings = &config.gemini;
    let client = HttpClient::with_timeout(Duration::from_secs(settings.timeout_secs))?;

    let gemini = GeminiConfig::new(settings.api_key.clone().unwrap_or_default())
        .with_model(settings.model.clone())
        .with_base_url(settings.base_url.clone());
    let provider = GeminiProvider::new(client, gemini);

    if provider.is_configured() {
        info!(model = %settings.model, "Using Gemini provider");
    } else {
        warn!("GOOGLE_API_KEY is not set, classification requests will fail");
    }

    Ok(Arc::new(provider))
}
