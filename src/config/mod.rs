mod app_config;

pub use app_config::{
    ApiKeySettings, AppConfig, CorsConfig, GeminiSettings, LogFormat, LoggingConfig,
    MetricsConfig, RateLimitSettings, ServerConfig, UploadConfig, WorkerConfig,
};
