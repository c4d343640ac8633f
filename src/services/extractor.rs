// src/services/extractor.rs

use async_trait::async_trait;

use crate::utils::upload::{MaterialKind, MaterialUpload};

#[derive(Debug, thiserror::Error)]
#[error("could not extract text from {file_name}: {reason}")]
pub struct ExtractionError {
    pub file_name: String,
    pub reason: String,
}

/// Turns an uploaded study file into text.
///
/// `Ok(None)` means this extractor cannot read that kind of file.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, upload: &MaterialUpload) -> Result<Option<String>, ExtractionError>;
}

/// Reads plain-text uploads directly. PDFs and images need an OCR-capable
/// extractor and yield `None` here.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract_text(&self, upload: &MaterialUpload) -> Result<Option<String>, ExtractionError> {
        match upload.kind {
            MaterialKind::PlainText => {
                let text = std::str::from_utf8(&upload.bytes).map_err(|e| ExtractionError {
                    file_name: upload.file_name.clone(),
                    reason: e.to_string(),
                })?;
                Ok(Some(text.to_string()))
            }
            MaterialKind::Pdf | MaterialKind::Image => {
                tracing::warn!(
                    "No extractor configured for {:?} upload '{}'",
                    upload.kind,
                    upload.file_name
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(kind: MaterialKind, bytes: &[u8]) -> MaterialUpload {
        MaterialUpload {
            file_name: "notes".to_string(),
            kind,
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_plain_text_is_decoded() {
        let text = PlainTextExtractor
            .extract_text(&upload(MaterialKind::PlainText, "Mitochondria".as_bytes()))
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("Mitochondria"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_an_error() {
        let result = PlainTextExtractor
            .extract_text(&upload(MaterialKind::PlainText, &[0xff, 0xfe, 0xfd]))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_pdf_is_not_readable_here() {
        let text = PlainTextExtractor
            .extract_text(&upload(MaterialKind::Pdf, b"%PDF-1.7"))
            .await
            .unwrap();
        assert!(text.is_none());
    }
}
