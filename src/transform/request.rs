use crate::error::{RecommenderError, Result};
use crate::models::GenerationConfig;
use crate::models::gemini::{FileData, GeminiContent, GeminiPart, GeminiRequest, SafetySetting};
use crate::prompt::{ContentItem, Prompt};

use super::validation::validate_generation_config;

/// Convert one content item to its wire part
pub fn convert_item(item: &ContentItem) -> GeminiPart {
    match item {
        ContentItem::Text(text) => GeminiPart::Text { text: text.clone() },
        ContentItem::ImageRef(image) => GeminiPart::FileData {
            file_data: FileData {
                mime_type: image.mime_type.clone(),
                file_uri: image.uri.clone(),
            },
        },
    }
}

/// Build the request body for a prompt
///
/// The whole prompt becomes a single user turn; item order is preserved part for part.
pub fn build_request(
    prompt: &Prompt,
    config: &GenerationConfig,
    safety_settings: &[SafetySetting],
) -> Result<GeminiRequest> {
    validate_generation_config(config)?;

    let parts: Vec<GeminiPart> = prompt.items().iter().map(convert_item).collect();
    tracing::debug!(
        parts = parts.len(),
        images = prompt.images().count(),
        "Built request contents"
    );

    Ok(GeminiRequest {
        contents: vec![GeminiContent {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: config.to_wire(),
        safety_settings: if safety_settings.is_empty() {
            None
        } else {
            Some(safety_settings.to_vec())
        },
    })
}

/// Build the request body for a plain text prompt
pub fn build_text_request(
    text: &str,
    config: &GenerationConfig,
    safety_settings: &[SafetySetting],
) -> Result<GeminiRequest> {
    if text.trim().is_empty() {
        return Err(RecommenderError::InvalidPrompt(
            "Prompt text is empty".to_string(),
        ));
    }
    let prompt = Prompt::new(vec![ContentItem::text(text)]);
    build_request(&prompt, config, safety_settings)
}
