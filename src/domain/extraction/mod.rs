//! Text extraction from uploaded files

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while turning an upload into text
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {filename}")]
    UnsupportedType { filename: String },

    #[error("File is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("File is empty or contains no extractable text")]
    EmptyText,
}

impl ExtractionError {
    /// Message shown to the person who uploaded the file
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "Invalid file type. Please upload a PDF or TXT file.",
            _ => "File is empty or text could not be extracted.",
        }
    }
}

/// Kinds of upload accepted for content scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    PlainText,
}

impl UploadKind {
    /// Detect the kind from the file name suffix (case-sensitive)
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        if filename.ends_with(".pdf") {
            Ok(Self::Pdf)
        } else if filename.ends_with(".txt") {
            Ok(Self::PlainText)
        } else {
            Err(ExtractionError::UnsupportedType {
                filename: filename.to_string(),
            })
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::PlainText => write!(f, "txt"),
        }
    }
}

/// Turns raw upload bytes into text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, ExtractionError>;
}

/// Reject text that is empty once whitespace is stripped
pub fn require_text(text: String) -> Result<String, ExtractionError> {
    if text.trim().is_empty() {
        Err(ExtractionError::EmptyText)
    } else {
        Ok(text)
    }
}
