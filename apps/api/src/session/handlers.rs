//! Axum route handlers for the campaign session.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::tone::{tone_options, ToneOptions};
use crate::models::asset::MarketingAsset;
use crate::session::state::SessionSnapshot;
use crate::state::AppState;

/// Multipart field carrying the uploaded document.
const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InputTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ContextRequest {
    pub tone: Option<String>,
    pub target_audience: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Falls back to the session's stored input text when absent.
    pub source_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditAssetRequest {
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot().await)
}

/// PUT /api/v1/session/input
pub async fn handle_set_input(
    State(state): State<AppState>,
    Json(req): Json<InputTextRequest>,
) -> Json<SessionSnapshot> {
    Json(state.session.set_input_text(req.text).await)
}

/// PUT /api/v1/session/context
pub async fn handle_set_context(
    State(state): State<AppState>,
    Json(req): Json<ContextRequest>,
) -> Json<SessionSnapshot> {
    Json(state.session.set_context(req.tone, req.target_audience).await)
}

/// POST /api/v1/session/generate
///
/// An empty body uses the stored input text. Anything else must be a
/// well-formed JSON `GenerateRequest`.
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SessionSnapshot>, AppError> {
    let request = parse_generate_body(&headers, &body)?;
    let snapshot = state.session.submit_text(request.source_text).await?;
    Ok(Json(snapshot))
}

fn parse_generate_body(headers: &HeaderMap, body: &[u8]) -> Result<GenerateRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateRequest::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"));
    if !is_json {
        return Err(AppError::Validation(
            "Expected an empty body or Content-Type: application/json".to_string(),
        ));
    }

    Json::<GenerateRequest>::from_bytes(body)
        .map(|Json(request)| request)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// POST /api/v1/session/upload
///
/// Expects a multipart form with a `file` field. The part's declared
/// content type is what the PDF gate checks.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let media_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;

        let snapshot = state.session.upload_document(&media_type, bytes).await?;
        return Ok(Json(snapshot));
    }

    Err(AppError::Validation(format!(
        "No '{UPLOAD_FIELD}' field in upload"
    )))
}

/// GET /api/v1/tones
pub async fn handle_tones() -> Json<ToneOptions> {
    Json(tone_options())
}

/// PATCH /api/v1/assets/:id
pub async fn handle_edit_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EditAssetRequest>,
) -> Result<Json<MarketingAsset>, AppError> {
    state
        .session
        .edit_asset(&id, req.content)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Asset {id} not found")))
}

/// DELETE /api/v1/assets/:id
pub async fn handle_delete_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.session.delete_asset(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Asset {id} not found")))
    }
}

/// GET /api/v1/assets/:id/copy
///
/// Plain-text rendering for the clipboard.
pub async fn handle_copy_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let asset = state
        .session
        .asset(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Asset {id} not found")))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        asset.clipboard_text(),
    ))
}
