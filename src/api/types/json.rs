//! Lenient JSON body extractor

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON body that never rejects on content
///
/// A missing, empty or malformed body (or one that does not match `T`)
/// yields `OptionalJson(None)` so handlers can answer with their own
/// field-level message. Only a body that cannot be read is rejected.
#[derive(Debug, Clone, Default)]
pub struct OptionalJson<T>(pub Option<T>);

impl<S, T> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            ApiError::payload_too_large(format!("Failed to read request body: {}", rejection))
        })?;

        Ok(Self(parse_body(&bytes)))
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    serde_json::from_slice(bytes).ok()
}
