use async_trait::async_trait;

use crate::domain::extraction::{ExtractionError, TextExtractor};

/// UTF-8 text files
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, ExtractionError> {
        String::from_utf8(bytes).map_err(|e| ExtractionError::Encoding(e.to_string()))
    }
}
