//! Text extractor implementations

mod pdf;
mod plain_text;

pub use pdf::PdfTextExtractor;
pub use plain_text::PlainTextExtractor;

use crate::domain::extraction::{require_text, ExtractionError, TextExtractor, UploadKind};

/// Extract non-blank text from an upload of the given kind
pub async fn extract_upload(kind: UploadKind, bytes: Vec<u8>) -> Result<String, ExtractionError> {
    let text = match kind {
        UploadKind::Pdf => PdfTextExtractor.extract(bytes).await?,
        UploadKind::PlainText => PlainTextExtractor.extract(bytes).await?,
    };

    require_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_extract_upload_plain_text() {
        let text = extract_upload(UploadKind::PlainText, b"Dear customer".to_vec())
            .await
            .unwrap();
        assert_eq!(text, "Dear customer");
    }

    #[tokio::test]
    async fn test_extract_upload_rejects_blank_text() {
        let result = extract_upload(UploadKind::PlainText, b"   \n".to_vec()).await;
        assert!(matches!(result, Err(ExtractionError::EmptyText)));
    }

    #[tokio::test]
    async fn test_extract_upload_rejects_garbage_pdf() {
        let result = extract_upload(UploadKind::Pdf, b"definitely not a pdf".to_vec()).await;
        assert!(matches!(result, Err(ExtractionError::Pdf(_))));
    }
}
