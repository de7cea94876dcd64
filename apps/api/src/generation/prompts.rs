// Prompt template for campaign asset generation.

/// Asset generation prompt template.
/// Replace: {source_text}, {tone}, {target_audience}, {requirements}
pub const CAMPAIGN_PROMPT_TEMPLATE: &str = r#"Analyze the following marketing content and generate a diverse set of high-converting marketing assets.

Source Content: "{source_text}"
Desired Tone: "{tone}"
Target Audience: "{target_audience}"

Requirements:
{requirements}

Provide the output in a structured JSON format."#;
