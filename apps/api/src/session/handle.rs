//! Async driver for `CampaignSession`.
//!
//! Each action takes the lock, runs the `begin_*` transition, releases the
//! lock, awaits the single suspension point, then takes the lock again for
//! `finish_*`. The lock is never held across the await, so snapshots and
//! asset edits stay responsive while a request is in flight.
//!
//! The suspension point runs on its own task: if the HTTP request that
//! started it goes away, the task still reports its completion, so the
//! session always returns to `Idle`.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::errors::CampaignError;
use crate::extraction::TextExtractor;
use crate::generation::client::GenerationClient;
use crate::generation::tone::is_preset;
use crate::models::asset::MarketingAsset;
use crate::session::state::{CampaignSession, SessionSnapshot};

#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<CampaignSession>>,
    generator: GenerationClient,
    extractor: Arc<dyn TextExtractor>,
}

impl SessionHandle {
    pub fn new(generator: GenerationClient, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            session: Arc::new(Mutex::new(CampaignSession::new())),
            generator,
            extractor,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn set_input_text(&self, text: String) -> SessionSnapshot {
        let mut session = self.session.lock().await;
        session.set_input_text(text);
        session.snapshot()
    }

    pub async fn set_context(
        &self,
        tone: Option<String>,
        target_audience: Option<String>,
    ) -> SessionSnapshot {
        if let Some(t) = tone.as_deref().filter(|t| !is_preset(t)) {
            info!("Using custom tone {t:?}");
        }
        let mut session = self.session.lock().await;
        session.set_context(tone, target_audience);
        session.snapshot()
    }

    /// Generates assets from `text`, or from the stored input text when
    /// `text` is `None`.
    pub async fn submit_text(&self, text: Option<String>) -> Result<SessionSnapshot, CampaignError> {
        let params = {
            let mut session = self.session.lock().await;
            let text = text.unwrap_or_else(|| session.input_text().to_string());
            session.begin_generation(text)?
        };

        info!(
            "Generation started ({} chars of source text)",
            params.source_text.len()
        );

        let generator = self.generator.clone();
        let session = self.session.clone();
        let task = tokio::spawn(async move {
            let result = generator.generate_assets(&params).await;
            let mut session = session.lock().await;
            session.finish_generation(result.clone());
            (result, session.snapshot())
        });

        match task.await {
            Ok((Ok(_), snapshot)) => Ok(snapshot),
            Ok((Err(e), _)) => Err(e),
            Err(join_err) => {
                error!("Generation task aborted: {join_err}");
                self.session
                    .lock()
                    .await
                    .finish_generation(Err(CampaignError::GenerationFailed));
                Err(CampaignError::GenerationFailed)
            }
        }
    }

    /// Extracts text from an uploaded document into the input text. Does not
    /// start a generation.
    pub async fn upload_document(
        &self,
        media_type: &str,
        bytes: Bytes,
    ) -> Result<SessionSnapshot, CampaignError> {
        self.session.lock().await.begin_upload(media_type)?;

        info!("Extracting text from {} byte document", bytes.len());

        let extractor = self.extractor.clone();
        let session = self.session.clone();
        let task = tokio::spawn(async move {
            let result = extractor.extract_text(bytes).await.map_err(|e| {
                warn!("Document extraction failed: {e}");
                CampaignError::ExtractionFailed
            });
            let mut session = session.lock().await;
            session.finish_upload(result.clone());
            (result.map(|_| ()), session.snapshot())
        });

        match task.await {
            Ok((Ok(()), snapshot)) => Ok(snapshot),
            Ok((Err(e), _)) => Err(e),
            Err(join_err) => {
                error!("Extraction task aborted: {join_err}");
                self.session
                    .lock()
                    .await
                    .finish_upload(Err(CampaignError::ExtractionFailed));
                Err(CampaignError::ExtractionFailed)
            }
        }
    }

    /// Returns the edited asset, or `None` if `id` is not in the list.
    pub async fn edit_asset(&self, id: &str, content: String) -> Option<MarketingAsset> {
        let mut session = self.session.lock().await;
        if session.edit_asset(id, content) {
            session.asset(id).cloned()
        } else {
            None
        }
    }

    pub async fn delete_asset(&self, id: &str) -> bool {
        self.session.lock().await.delete_asset(id)
    }

    pub async fn asset(&self, id: &str) -> Option<MarketingAsset> {
        self.session.lock().await.asset(id).cloned()
    }
}
