//! API key registry trait

use async_trait::async_trait;

use super::ApiKeyOwner;
use crate::domain::DomainError;

/// Registry of accepted API keys
///
/// Implementations never need the plaintext after registration; lookups go
/// through the key digest.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Find the owner of a presented key
    async fn lookup(&self, key: &str) -> Result<Option<ApiKeyOwner>, DomainError>;

    /// Register a key by its digest, replacing any previous owner
    async fn register(&self, digest: &str, owner: ApiKeyOwner) -> Result<(), DomainError>;

    /// Number of registered keys
    async fn count(&self) -> Result<usize, DomainError>;
}
