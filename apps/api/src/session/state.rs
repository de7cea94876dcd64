//! Campaign Session State — the single-user state machine.
//!
//! Two statuses, `Idle` and `Busy`. Extraction and generation are split into
//! `begin_*` / `finish_*` transitions around their one suspension point so the
//! machine itself stays synchronous; `SessionHandle` drives the await.
//!
//! INVARIANT: asset ids are unique within `assets`. Assets only arrive as a
//! whole batch from `finish_generation`, which replaces the list.

use serde::Serialize;

use crate::errors::{CampaignError, ErrorView};
use crate::extraction::is_pdf_media_type;
use crate::generation::tone::{DEFAULT_AUDIENCE, DEFAULT_TONE};
use crate::models::asset::{GenerationParams, MarketingAsset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Busy,
}

/// Which view the output panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputPanel {
    /// Busy with nothing to show yet.
    Generating,
    Empty,
    Assets,
}

#[derive(Debug, Clone)]
pub struct CampaignSession {
    status: SessionStatus,
    input_text: String,
    tone: String,
    target_audience: String,
    assets: Vec<MarketingAsset>,
    error: Option<CampaignError>,
}

/// Read model handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub input_text: String,
    pub tone: String,
    pub target_audience: String,
    pub assets: Vec<MarketingAsset>,
    pub error: Option<ErrorView>,
    /// Submit and upload are disabled while busy.
    pub actions_enabled: bool,
    pub panel: OutputPanel,
}

impl Default for CampaignSession {
    fn default() -> Self {
        Self {
            status: SessionStatus::Idle,
            input_text: String::new(),
            tone: DEFAULT_TONE.to_string(),
            target_audience: DEFAULT_AUDIENCE.to_string(),
            assets: Vec::new(),
            error: None,
        }
    }
}

impl CampaignSession {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == SessionStatus::Busy
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    #[cfg(test)]
    pub fn assets(&self) -> &[MarketingAsset] {
        &self.assets
    }

    pub fn asset(&self, id: &str) -> Option<&MarketingAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&CampaignError> {
        self.error.as_ref()
    }

    pub fn set_input_text(&mut self, text: String) {
        self.input_text = text;
    }

    /// Updates tone and/or audience. `None` leaves a field unchanged.
    pub fn set_context(&mut self, tone: Option<String>, target_audience: Option<String>) {
        if let Some(tone) = tone {
            self.tone = tone;
        }
        if let Some(audience) = target_audience {
            self.target_audience = audience;
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Generation
    // ────────────────────────────────────────────────────────────────────

    /// Starts a generation for `text`.
    ///
    /// Busy: rejected, nothing changes. Blank text: the visible error becomes
    /// `InvalidInput` and no request should be made. Otherwise the text
    /// becomes the input, the error clears, the session goes `Busy` and the
    /// params for the Generation Client are returned.
    pub fn begin_generation(&mut self, text: String) -> Result<GenerationParams, CampaignError> {
        if self.is_busy() {
            return Err(CampaignError::Busy);
        }

        let source_text = text.trim().to_string();
        if source_text.is_empty() {
            self.error = Some(CampaignError::InvalidInput);
            return Err(CampaignError::InvalidInput);
        }

        self.input_text = text;
        self.error = None;
        self.status = SessionStatus::Busy;

        Ok(GenerationParams {
            source_text,
            tone: self.tone.clone(),
            target_audience: self.target_audience.clone(),
        })
    }

    /// Completes the in-flight generation. Success replaces the asset list
    /// wholesale; failure keeps it and records the error.
    pub fn finish_generation(&mut self, result: Result<Vec<MarketingAsset>, CampaignError>) {
        match result {
            Ok(assets) => {
                self.assets = assets;
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
        self.status = SessionStatus::Idle;
    }

    // ────────────────────────────────────────────────────────────────────
    // Upload
    // ────────────────────────────────────────────────────────────────────

    /// Starts a document upload with the file's declared media type.
    ///
    /// Busy: rejected, nothing changes. Not a PDF: the visible error becomes
    /// `UnsupportedFileType` and the extractor must not run.
    pub fn begin_upload(&mut self, media_type: &str) -> Result<(), CampaignError> {
        if self.is_busy() {
            return Err(CampaignError::Busy);
        }

        if !is_pdf_media_type(media_type) {
            self.error = Some(CampaignError::UnsupportedFileType);
            return Err(CampaignError::UnsupportedFileType);
        }

        self.error = None;
        self.status = SessionStatus::Busy;
        Ok(())
    }

    /// Completes the in-flight extraction. Success replaces the input text
    /// and does not start a generation.
    pub fn finish_upload(&mut self, result: Result<String, CampaignError>) {
        match result {
            Ok(text) => {
                self.input_text = text;
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
        self.status = SessionStatus::Idle;
    }

    // ────────────────────────────────────────────────────────────────────
    // Asset edits
    // ────────────────────────────────────────────────────────────────────

    /// Replaces the content of asset `id`. Returns false (and changes
    /// nothing) when no such asset exists.
    pub fn edit_asset(&mut self, id: &str, content: String) -> bool {
        match self.assets.iter_mut().find(|a| a.id == id) {
            Some(asset) => {
                asset.content = content;
                true
            }
            None => false,
        }
    }

    /// Removes asset `id`. Returns false when no such asset exists.
    pub fn delete_asset(&mut self, id: &str) -> bool {
        let before = self.assets.len();
        self.assets.retain(|a| a.id != id);
        self.assets.len() != before
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let panel = if self.assets.is_empty() {
            if self.is_busy() {
                OutputPanel::Generating
            } else {
                OutputPanel::Empty
            }
        } else {
            OutputPanel::Assets
        };

        SessionSnapshot {
            status: self.status,
            input_text: self.input_text.clone(),
            tone: self.tone.clone(),
            target_audience: self.target_audience.clone(),
            assets: self.assets.clone(),
            error: self.error.as_ref().map(ErrorView::from),
            actions_enabled: !self.is_busy(),
            panel,
        }
    }
}
