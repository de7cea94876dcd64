use serde::{Deserialize, Serialize};

/// The asset kinds the generation prompt asks for.
///
/// The backend labels each asset with free text; this list documents the
/// expected labels and is never used to reject a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssetKind {
    LinkedInPost,
    TwitterThread,
    InstagramCaption,
    FacebookAd,
    GoogleSearchAd,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::LinkedInPost,
        AssetKind::TwitterThread,
        AssetKind::InstagramCaption,
        AssetKind::FacebookAd,
        AssetKind::GoogleSearchAd,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::LinkedInPost => "LinkedIn Post",
            AssetKind::TwitterThread => "Twitter Thread",
            AssetKind::InstagramCaption => "Instagram Caption",
            AssetKind::FacebookAd => "Facebook Ad",
            AssetKind::GoogleSearchAd => "Google Search Ad",
        }
    }

    /// Case-insensitive lookup of a backend-supplied label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(label))
    }
}

/// One generated piece of marketing copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingAsset {
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    /// Stored without the leading `#`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
}

impl MarketingAsset {
    pub fn kind(&self) -> Option<AssetKind> {
        AssetKind::from_label(&self.asset_type)
    }

    /// Renders the asset the way the copy action puts it on the clipboard:
    /// headline and a blank line, the body, then a blank line and the
    /// `#`-prefixed hashtags.
    pub fn clipboard_text(&self) -> String {
        let mut out = String::new();

        if let Some(headline) = self.headline.as_deref().filter(|h| !h.trim().is_empty()) {
            out.push_str(headline);
            out.push_str("\n\n");
        }

        out.push_str(&self.content);

        let tags = self.hashtags.as_deref().unwrap_or_default();
        if !tags.is_empty() {
            out.push_str("\n\n");
            out.push_str(
                &tags
                    .iter()
                    .map(|t| format!("#{t}"))
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }

        out
    }
}

/// Strips the leading `#` markers from backend-supplied tags and drops the
/// ones left empty.
pub fn normalize_hashtags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().trim_start_matches('#').trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Inputs to a single generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Trimmed and non-empty; the session validates it before building params.
    pub source_text: String,
    pub tone: String,
    pub target_audience: String,
}
