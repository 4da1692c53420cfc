//! API key generation, storage and authentication

mod generator;
mod in_memory;
mod service;

pub use generator::{hash_key, ApiKeyGenerator, GeneratedApiKey};
pub use in_memory::{InMemoryApiKeyRepository, DEMO_KEYS};
pub use service::{ApiKeyService, AuthenticatedKey};
