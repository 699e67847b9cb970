use crate::error::{ExtractionError, QaError};
use crate::models::MediaType;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

const OCTET_STREAM: &str = "application/octet-stream";

/// Turns uploaded file bytes into plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentProcessor;

impl DocumentProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the media type from the declared content type, falling back to the filename
    /// extension when the client sent no type or the generic `application/octet-stream`.
    pub fn detect_media_type(
        content_type: Option<&str>,
        filename: &str,
    ) -> Result<MediaType, ExtractionError> {
        let essence = content_type
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty());

        match essence.as_deref() {
            Some("application/pdf") => Ok(MediaType::Pdf),
            Some("text/plain") => Ok(MediaType::PlainText),
            None | Some(OCTET_STREAM) => Self::media_type_from_extension(filename),
            Some(other) => Err(ExtractionError::UnsupportedMediaType(other.to_string())),
        }
    }

    fn media_type_from_extension(filename: &str) -> Result<MediaType, ExtractionError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(MediaType::Pdf),
            Some("txt") => Ok(MediaType::PlainText),
            _ => Err(ExtractionError::UnsupportedMediaType(filename.to_string())),
        }
    }

    pub fn extract(&self, bytes: &[u8], media_type: MediaType) -> Result<String, ExtractionError> {
        let text = match media_type {
            MediaType::Pdf => self.extract_pdf(bytes)?,
            MediaType::PlainText => self.extract_plain_text(bytes)?,
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::NoExtractableContent);
        }

        Ok(text)
    }

    /// Same as [`extract`](Self::extract) but runs on the blocking pool, since PDF parsing is
    /// CPU-bound.
    pub async fn extract_blocking(
        &self,
        bytes: Vec<u8>,
        media_type: MediaType,
    ) -> Result<String, QaError> {
        let processor = *self;
        let text = tokio::task::spawn_blocking(move || processor.extract(&bytes, media_type))
            .await
            .map_err(|e| QaError::Task(e.to_string()))??;
        Ok(text)
    }

    fn extract_pdf(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        // pdf-extract panics on some malformed inputs instead of returning an error.
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }))
        .map_err(|_| ExtractionError::InvalidPdf("parser aborted on malformed input".to_string()))?
        .map_err(|e| ExtractionError::InvalidPdf(e.to_string()))?;

        log::debug!("Extracted {} PDF pages", pages.len());
        Ok(join_pages(pages))
    }

    fn extract_plain_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// Concatenate page texts in page order. Pages without text add nothing; whitespace a page
/// carries is kept so words on adjacent pages stay apart.
fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages.into_iter().collect()
}
