//! PDF text layer extraction
//!
//! Parsing is CPU-bound and runs on the blocking pool. Scanned PDFs without a
//! text layer yield no text and are rejected by the caller.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::extraction::{ExtractionError, TextExtractor};

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, ExtractionError> {
        let size = bytes.len();

        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .map_err(|e| ExtractionError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| ExtractionError::Pdf(format!("extraction task aborted: {}", e)))??;

        debug!(bytes = size, pages = pages.len(), "Extracted PDF text layer");

        Ok(join_pages(&pages))
    }
}

/// Join the non-blank page texts with a single space, keeping each page's layout
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
