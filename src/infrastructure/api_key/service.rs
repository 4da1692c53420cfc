//! API key service

use std::sync::Arc;

use tracing::{debug, info};

use super::generator::{hash_key, ApiKeyGenerator};
use crate::domain::api_key::{ApiKeyOwner, ApiKeyRepository};
use crate::domain::DomainError;

/// A key that passed authentication
#[derive(Debug, Clone)]
pub struct AuthenticatedKey {
    /// Digest of the presented key, safe to use as a limiter bucket
    pub digest: String,
    pub owner: ApiKeyOwner,
}

pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
    generator: ApiKeyGenerator,
}

impl std::fmt::Debug for ApiKeyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyService")
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}

impl ApiKeyService {
    /// Service over `repository` using the default generator
    pub fn new(repository: Arc<dyn ApiKeyRepository>) -> Self {
        Self {
            repository,
            generator: ApiKeyGenerator::new(),
        }
    }

    /// Replace the key generator
    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Mint and register a new key, returning the plaintext
    pub async fn generate(&self, owner: ApiKeyOwner) -> Result<String, DomainError> {
        let generated = self.generator.generate();

        self.repository
            .register(&generated.digest, owner.clone())
            .await?;

        info!(owner = %owner.name, quota = %owner.rate_limit, "API key generated");

        Ok(generated.key)
    }

    /// Resolve a presented key; `None` for missing or unknown keys
    pub async fn authenticate(&self, key: &str) -> Result<Option<AuthenticatedKey>, DomainError> {
        if key.is_empty() {
            return Ok(None);
        }

        let owner = self.repository.lookup(key).await?;

        if owner.is_none() {
            debug!("Rejected unknown API key");
        }

        Ok(owner.map(|owner| AuthenticatedKey {
            digest: hash_key(key),
            owner,
        }))
    }

    /// Number of registered keys
    pub async fn active_keys(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::api_key::InMemoryApiKeyRepository;

    fn service() -> ApiKeyService {
        ApiKeyService::new(Arc::new(InMemoryApiKeyRepository::with_demo_keys()))
    }

    #[tokio::test]
    async fn test_generated_key_authenticates() {
        let service = service();

        let key = service.generate(ApiKeyOwner::generated()).await.unwrap();
        let authenticated = service.authenticate(&key).await.unwrap().unwrap();

        assert_eq!(authenticated.owner.name, "Generated User");
        assert_eq!(authenticated.owner.rate_limit.to_string(), "100/hour");
        assert_eq!(authenticated.digest, hash_key(&key));
        assert_eq!(service.active_keys().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_generated_keys_use_prefix() {
        let service = service().with_generator(ApiKeyGenerator::new().with_prefix("sw_"));

        let key = service.generate(ApiKeyOwner::generated()).await.unwrap();

        assert!(key.starts_with("sw_"));
    }

    #[tokio::test]
    async fn test_rejects_missing_and_unknown_keys() {
        let service = service();

        assert!(service.authenticate("").await.unwrap().is_none());
        assert!(service.authenticate("invalid").await.unwrap().is_none());
        assert!(service.authenticate("demo-key-123").await.unwrap().is_some());
    }
}
