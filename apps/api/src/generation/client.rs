//! Generation Client — turns `GenerationParams` into a batch of `MarketingAsset`s.
//!
//! Flow: build prompt → backend call with the declared schema → parse →
//!       normalize → assign ids.
//!
//! One attempt per invocation. Every failure collapses into
//! `CampaignError::GenerationFailed`; the cause is logged, never returned.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::errors::CampaignError;
use crate::generation::prompts::CAMPAIGN_PROMPT_TEMPLATE;
use crate::generation::schema::{asset_response_schema, GeneratedAsset};
use crate::llm_client::{strip_json_fences, GenerationBackend, LlmError};
use crate::models::asset::{normalize_hashtags, AssetKind, GenerationParams, MarketingAsset};

#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Generates one batch of assets. `params.source_text` must already be
    /// validated as non-empty; it is not re-checked here.
    pub async fn generate_assets(
        &self,
        params: &GenerationParams,
    ) -> Result<Vec<MarketingAsset>, CampaignError> {
        let prompt = build_campaign_prompt(params);

        match self.request_assets(&prompt).await {
            Ok(generated) => {
                let assets = assign_ids(generated, Utc::now().timestamp_millis());
                for asset in assets.iter().filter(|a| a.kind().is_none()) {
                    debug!("Keeping asset with unrecognised type {:?}", asset.asset_type);
                }
                info!(
                    "Generated {} assets (tone={:?}, audience={:?})",
                    assets.len(),
                    params.tone,
                    params.target_audience
                );
                Ok(assets)
            }
            Err(e) => {
                error!("Error calling generative backend: {e}");
                Err(CampaignError::GenerationFailed)
            }
        }
    }

    async fn request_assets(&self, prompt: &str) -> Result<Vec<GeneratedAsset>, LlmError> {
        let schema = asset_response_schema();
        let payload = self.backend.generate(prompt, &schema).await?;
        parse_assets(payload.as_deref())
    }
}

/// Fills the prompt template. The source text is substituted last so its
/// contents are never scanned for placeholders.
pub fn build_campaign_prompt(params: &GenerationParams) -> String {
    let requirements = AssetKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("{}. {}: {}", i + 1, kind.label(), requirement_for(*kind)))
        .collect::<Vec<_>>()
        .join("\n");

    CAMPAIGN_PROMPT_TEMPLATE
        .replace("{requirements}", &requirements)
        .replace("{target_audience}", &params.target_audience)
        .replace("{tone}", &params.tone)
        .replace("{source_text}", &params.source_text)
}

fn requirement_for(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::LinkedInPost => "Thought-leadership style, professional but hooky.",
        AssetKind::TwitterThread => "A 4-tweet thread with a strong opening \"hook\".",
        AssetKind::InstagramCaption => "Punchy, emojis included, lifestyle-oriented.",
        AssetKind::FacebookAd => "Direct response, focusing on pain points and solutions.",
        AssetKind::GoogleSearchAd => "Two headlines and a description.",
    }
}

/// Parses the backend payload as the declared schema. An absent or blank
/// payload is an empty batch.
pub fn parse_assets(payload: Option<&str>) -> Result<Vec<GeneratedAsset>, LlmError> {
    let text = payload
        .map(strip_json_fences)
        .filter(|t| !t.is_empty())
        .unwrap_or("[]");

    let assets: Vec<GeneratedAsset> = serde_json::from_str(text)?;

    if let Some(index) = assets.iter().position(|a| a.content.trim().is_empty()) {
        return Err(LlmError::Schema(format!(
            "asset at index {index} has empty content"
        )));
    }

    Ok(assets)
}

/// Ids combine the batch timestamp with the position, unique within a batch.
fn assign_ids(generated: Vec<GeneratedAsset>, stamp_millis: i64) -> Vec<MarketingAsset> {
    generated
        .into_iter()
        .enumerate()
        .map(|(index, g)| MarketingAsset {
            id: format!("asset-{stamp_millis}-{index}"),
            asset_type: g.asset_type,
            content: g.content,
            headline: g.headline,
            hashtags: g.hashtags.map(normalize_hashtags),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
