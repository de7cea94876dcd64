//! Text Source Resolver — turns an uploaded document into source text.
//!
//! The media type gate lives in the session, not here: extractors decode
//! whatever bytes they are handed.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// The only document type the upload action accepts.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF decode error: {0}")]
    Decode(String),

    #[error("Extraction task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, ExtractionError>;
}

/// `pdf-extract` backed extractor. Page text is concatenated in page order.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, ExtractionError> {
        run_decoder(move || {
            pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| ExtractionError::Decode(format!("{e:?}")))
        })
        .await
    }
}

/// Runs a CPU-bound decoder off the async workers. `pdf-extract` panics on
/// some malformed files; a panic comes back as `ExtractionError::Aborted`.
async fn run_decoder<F>(decode: F) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError> + Send + 'static,
{
    tokio::task::spawn_blocking(decode).await?
}

/// Whether a declared media type names a PDF. Parameters such as
/// `; charset=binary` are ignored, the comparison is case-insensitive.
pub fn is_pdf_media_type(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
        .unwrap_or(false)
}
