use crate::error::{RecommenderError, Result};
use crate::models::GenerationConfig;
use crate::transform::validate_generation_config;
use serde::Deserialize;
use std::env;
use std::fs;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_VISION_MODEL: &str = "gemini-1.0-pro-vision";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.0-pro";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub vertex: VertexConfig,
    #[serde(default = "GenerationConfig::vision_default")]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VertexConfig {
    /// Google Cloud project id
    pub project: String,
    /// Google Cloud region, e.g. `us-central1`
    pub location: String,
    /// OAuth bearer token; without one the upstream rejects the call
    #[serde(default)]
    pub access_token: Option<String>,
    /// Base URL override, defaults to the regional Vertex AI host
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_vision_model() -> String {
    DEFAULT_VISION_MODEL.to_string()
}

fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

impl VertexConfig {
    pub fn new(project: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
            access_token: None,
            endpoint: None,
            vision_model: default_vision_model(),
            text_model: default_text_model(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Base URL of the Vertex AI API for the configured region
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }

    /// Full URL of a model method, e.g. `streamGenerateContent`
    pub fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:{}",
            self.base_url(),
            self.project,
            self.location,
            model,
            method
        )
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let project = env::var("GCP_PROJECT")
            .map_err(|_| RecommenderError::ConfigError("GCP_PROJECT not set".to_string()))?;

        let location = env::var("GCP_REGION")
            .map_err(|_| RecommenderError::ConfigError("GCP_REGION not set".to_string()))?;

        let listen_addr =
            env::var("RECOMMENDER_LISTEN_ADDR").unwrap_or_else(|_| default_listen_addr());

        let timeout_secs = match env::var("RECOMMENDER_TIMEOUT_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|e| {
                RecommenderError::ConfigError(format!("Invalid timeout value: {}", e))
            })?,
            Err(_) => default_timeout_secs(),
        };

        Ok(AppConfig {
            server: ServerConfig { listen_addr },
            vertex: VertexConfig {
                project,
                location,
                access_token: env::var("GCP_ACCESS_TOKEN").ok(),
                endpoint: env::var("VERTEX_ENDPOINT").ok(),
                vision_model: env::var("RECOMMENDER_VISION_MODEL")
                    .unwrap_or_else(|_| default_vision_model()),
                text_model: env::var("RECOMMENDER_TEXT_MODEL")
                    .unwrap_or_else(|_| default_text_model()),
                timeout_secs,
            },
            generation: GenerationConfig::vision_default(),
        })
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            RecommenderError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        let mut config = Self::from_toml(&contents)?;

        // Allow environment variables to override file config
        if let Ok(project) = env::var("GCP_PROJECT") {
            config.vertex.project = project;
        }
        if let Ok(location) = env::var("GCP_REGION") {
            config.vertex.location = location;
        }
        if let Ok(token) = env::var("GCP_ACCESS_TOKEN") {
            config.vertex.access_token = Some(token);
        }

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| {
            RecommenderError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.vertex.project.trim().is_empty() {
            return Err(RecommenderError::ConfigError(
                "Project is empty".to_string(),
            ));
        }

        if self.vertex.location.trim().is_empty() {
            return Err(RecommenderError::ConfigError(
                "Region is empty".to_string(),
            ));
        }

        if self.vertex.vision_model.is_empty() || self.vertex.text_model.is_empty() {
            return Err(RecommenderError::ConfigError(
                "Model names cannot be empty".to_string(),
            ));
        }

        if self.vertex.timeout_secs == 0 {
            return Err(RecommenderError::ConfigError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        validate_generation_config(&self.generation)
            .map_err(|e| RecommenderError::ConfigError(e.to_string()))?;

        Ok(())
    }
}
