//! Application state for shared services

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::{Classifier, TaskRepository};
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::rate_limit::RateLimiter;
use crate::infrastructure::task::TaskQueue;

/// Shared services handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub classifier: Arc<Classifier>,
    pub api_key_service: Arc<ApiKeyService>,
    pub task_repository: Arc<dyn TaskRepository>,
    pub task_queue: TaskQueue,
    pub rate_limiter: Arc<RateLimiter>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("classifier", &self.classifier)
            .field("task_queue", &self.task_queue)
            .finish_non_exhaustive()
    }
}
