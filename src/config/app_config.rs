use serde::Deserialize;

use crate::infrastructure::llm::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub rate_limits: RateLimitSettings,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub api_keys: ApiKeySettings,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Gemini API settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// Falls back to `GOOGLE_API_KEY` when unset
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

/// Per-route request limits, counted per client address
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub enabled: bool,
    /// Enforce each API key's nominal quota on top of the route limits (opt-in)
    pub enforce_key_quotas: bool,
    pub default_per_minute: u32,
    pub default_per_hour: u32,
    pub scam_per_minute: u32,
    pub predict_per_minute: u32,
    pub scan_url_per_minute: u32,
    pub scan_content_per_minute: u32,
}

/// Background scan worker pool
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub concurrency: usize,
    pub queue_capacity: usize,
    /// Artificial delay before each URL scan
    pub processing_delay_ms: u64,
    /// Finished tasks older than this are purged; `None` keeps them forever
    pub task_retention_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiKeySettings {
    pub seed_demo_keys: bool,
    /// Prefix prepended to generated keys
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: 60,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            enforce_key_quotas: false,
            default_per_minute: 100,
            default_per_hour: 1000,
            scam_per_minute: 10,
            predict_per_minute: 20,
            scan_url_per_minute: 50,
            scan_content_per_minute: 30,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            queue_capacity: 256,
            processing_delay_ms: 2000,
            task_retention_secs: None,
        }
    }
}

impl Default for ApiKeySettings {
    fn default() -> Self {
        Self {
            seed_demo_keys: true,
            prefix: None,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_fallbacks();

        Ok(app_config)
    }

    fn apply_env_fallbacks(&mut self) {
        let missing = self
            .gemini
            .api_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty());

        if missing {
            self.gemini.api_key = std::env::var("GOOGLE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
    }
}
