use serde::{Deserialize, Serialize};

use super::gemini::GeminiGenerationConfig;

/// Caller-supplied generation options for one model call
///
/// Everything except `stream` is forwarded to the model as `generationConfig`.
/// `stream` selects `streamGenerateContent` over `generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,

    #[serde(default = "default_stream")]
    pub stream: bool,
}

fn default_stream() -> bool {
    true
}

impl GenerationConfig {
    /// Low temperature, long answer: the settings the furniture demo ships with
    pub fn vision_default() -> Self {
        Self {
            temperature: Some(0.1),
            max_output_tokens: Some(2048),
            ..Self::unset()
        }
    }

    /// Provider defaults for everything, streamed
    pub fn text_default() -> Self {
        Self::unset()
    }

    fn unset() -> Self {
        Self {
            temperature: None,
            max_output_tokens: None,
            top_p: None,
            top_k: None,
            candidate_count: None,
            stop_sequences: None,
            stream: true,
        }
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// The wire form, or `None` when no option is set
    pub fn to_wire(&self) -> Option<GeminiGenerationConfig> {
        let wire = GeminiGenerationConfig {
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            candidate_count: self.candidate_count,
            stop_sequences: self.stop_sequences.clone(),
        };

        if wire == GeminiGenerationConfig::default() {
            None
        } else {
            Some(wire)
        }
    }
}
