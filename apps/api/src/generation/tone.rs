//! Brand voice presets offered by the tone selector.
//!
//! The selector is a closed list, but the session accepts any tone string:
//! the value is only ever embedded in the generation prompt.

use serde::Serialize;

pub const TONE_PRESETS: [&str; 5] = [
    "Professional & Engaging",
    "Witty & Viral",
    "Aggressive & Direct",
    "Luxury & Minimalist",
    "Friendly & Community-Focused",
];

pub const DEFAULT_TONE: &str = TONE_PRESETS[0];
pub const DEFAULT_AUDIENCE: &str = "Small business owners";

/// Whether `tone` is one of the selector presets (exact match).
pub fn is_preset(tone: &str) -> bool {
    TONE_PRESETS.contains(&tone)
}

/// Payload for the tone selector: presets plus the initial selections.
#[derive(Debug, Clone, Serialize)]
pub struct ToneOptions {
    pub presets: Vec<&'static str>,
    pub default_tone: &'static str,
    pub default_audience: &'static str,
}

pub fn tone_options() -> ToneOptions {
    ToneOptions {
        presets: TONE_PRESETS.to_vec(),
        default_tone: DEFAULT_TONE,
        default_audience: DEFAULT_AUDIENCE,
    }
}
