use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("Invalid generation config: {0}")]
    InvalidGenerationConfig(String),

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("Fragment {index} has no text: {reason}")]
    MissingText { index: usize, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The provider refused the prompt as a whole
    #[error("Prompt blocked by provider: {0}")]
    Blocked(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RecommenderError {
    /// Whether the failure came from the model provider rather than from our own input
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RecommenderError::UpstreamError(_)
                | RecommenderError::UpstreamStatus { .. }
                | RecommenderError::Blocked(_)
        )
    }

    /// Short machine-readable kind used in error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            RecommenderError::InvalidPrompt(_) => "invalid_prompt",
            RecommenderError::InvalidGenerationConfig(_) => "invalid_generation_config",
            RecommenderError::InvalidResponse(_) => "invalid_response",
            RecommenderError::MissingText { .. } => "missing_text",
            RecommenderError::ConfigError(_) => "config_error",
            RecommenderError::UpstreamError(_) | RecommenderError::UpstreamStatus { .. } => {
                "upstream_error"
            }
            RecommenderError::Blocked(_) => "blocked",
            RecommenderError::InternalError(_) | RecommenderError::JsonError(_) => "internal_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommenderError>;
