//! In-memory API key registry

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::generator::hash_key;
use crate::domain::api_key::{ApiKeyOwner, ApiKeyRepository, RateQuota};
use crate::domain::DomainError;

/// Keys available out of the box for local use
pub const DEMO_KEYS: [(&str, &str, u32); 2] = [
    ("demo-key-123", "Demo User", 100),
    ("admin-key-456", "Admin User", 1000),
];

/// In-memory implementation of ApiKeyRepository, keyed by key digest
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    keys: Arc<RwLock<HashMap<String, ApiKeyOwner>>>,
}

impl InMemoryApiKeyRepository {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the given plaintext keys
    pub fn with_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = (K, ApiKeyOwner)>,
        K: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|(key, owner)| (hash_key(key.as_ref()), owner))
            .collect();

        Self {
            keys: Arc::new(RwLock::new(keys)),
        }
    }

    /// Registry seeded with [`DEMO_KEYS`]
    pub fn with_demo_keys() -> Self {
        Self::with_keys(DEMO_KEYS.iter().map(|(key, name, per_hour)| {
            (*key, ApiKeyOwner::new(*name, RateQuota::per_hour(*per_hour)))
        }))
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn lookup(&self, key: &str) -> Result<Option<ApiKeyOwner>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.get(&hash_key(key)).cloned())
    }

    async fn register(&self, digest: &str, owner: ApiKeyOwner) -> Result<(), DomainError> {
        let mut keys = self.keys.write().await;
        keys.insert(digest.to_string(), owner);
        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.keys.read().await.len())
    }
}
