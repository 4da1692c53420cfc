//! API key generation
//!
//! Keys are 32 random bytes encoded as URL-safe base64 without padding,
//! optionally behind a fixed prefix. Only the SHA-256 digest is stored.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

const KEY_BYTES: usize = 32;

/// A freshly minted key
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The plaintext key (only shown once at creation)
    pub key: String,
    /// Digest used for storage and lookups
    pub digest: String,
}

/// Generator for API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    prefix: String,
}

impl ApiKeyGenerator {
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
        }
    }

    /// Prefix every generated key with `prefix`
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn generate(&self) -> GeneratedApiKey {
        let mut random_bytes = [0u8; KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let key = format!("{}{}", self.prefix, URL_SAFE_NO_PAD.encode(&random_bytes));
        let digest = hash_key(&key);

        GeneratedApiKey { key, digest }
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash an API key for storage
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("sha256${}", URL_SAFE_NO_PAD.encode(hasher.finalize()))
}
