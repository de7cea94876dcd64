use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Session-level failures. These are what the user sees; underlying causes
/// are logged where they happen and never carried here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampaignError {
    #[error("Provide some content first.")]
    InvalidInput,

    #[error("Please upload a valid PDF file.")]
    UnsupportedFileType,

    #[error("Failed to parse PDF. Please copy and paste the text manually.")]
    ExtractionFailed,

    #[error("Failed to generate campaign assets. Please check your source text and try again.")]
    GenerationFailed,

    /// Rejected because another extraction or generation is in flight.
    /// Never stored as the session's visible error.
    #[error("A request is already in progress.")]
    Busy,
}

impl CampaignError {
    pub fn kind(&self) -> &'static str {
        match self {
            CampaignError::InvalidInput => "INVALID_INPUT",
            CampaignError::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
            CampaignError::ExtractionFailed => "EXTRACTION_FAILED",
            CampaignError::GenerationFailed => "GENERATION_FAILED",
            CampaignError::Busy => "BUSY",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            CampaignError::InvalidInput => StatusCode::BAD_REQUEST,
            CampaignError::UnsupportedFileType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            CampaignError::ExtractionFailed => StatusCode::UNPROCESSABLE_ENTITY,
            CampaignError::GenerationFailed => StatusCode::BAD_GATEWAY,
            CampaignError::Busy => StatusCode::CONFLICT,
        }
    }
}

/// Serialized form of the session's visible error.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorView {
    pub kind: &'static str,
    pub message: String,
}

impl From<&CampaignError> for ErrorView {
    fn from(e: &CampaignError) -> Self {
        ErrorView {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Campaign(#[from] CampaignError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Campaign(e) => (e.status(), e.kind(), e.to_string()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
