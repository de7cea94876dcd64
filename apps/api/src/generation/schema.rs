//! Structured-output contract for asset generation.
//!
//! `asset_response_schema` is what the backend is told to produce;
//! `GeneratedAsset` is what we accept back. The two must describe the same
//! shape.

use serde::Deserialize;
use serde_json::{json, Value};

/// Response schema in the backend's OpenAPI-subset dialect.
pub fn asset_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "type": {
                    "type": "STRING",
                    "description": "The platform or type of asset"
                },
                "content": {
                    "type": "STRING",
                    "description": "The main body text of the asset"
                },
                "headline": {
                    "type": "STRING",
                    "description": "Optional headline or hook"
                },
                "hashtags": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Relevant hashtags without the #"
                }
            },
            "required": ["type", "content"]
        }
    })
}

/// One element of the backend's JSON array, before an id is assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedAsset {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub content: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub hashtags: Option<Vec<String>>,
}
