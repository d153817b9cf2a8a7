//! The recommendation service: one explicitly constructed object holding the model
//! client, model names and counters, shared by all request handlers.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use crate::client::VertexClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::metrics::RecommendationMetrics;
use crate::models::GenerationConfig;
use crate::models::gemini::GeminiRequest;
use crate::prompt::Prompt;
use crate::provider::Provider;
use crate::streaming::{AggregatedResponse, ResponseAggregator};
use crate::transform::{build_request, build_text_request, permissive_safety_settings};

/// A finished model answer
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub id: Uuid,
    pub model: String,
    pub response: AggregatedResponse,
}

pub struct Recommender {
    provider: Arc<dyn Provider>,
    vision_model: String,
    text_model: String,
    metrics: RecommendationMetrics,
}

impl Recommender {
    pub fn new(
        provider: Arc<dyn Provider>,
        vision_model: impl Into<String>,
        text_model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            vision_model: vision_model.into(),
            text_model: text_model.into(),
            metrics: RecommendationMetrics::new(),
        }
    }

    /// Build the Vertex AI client once and wrap it
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = VertexClient::new(config.vertex.clone())?;
        Ok(Self::new(
            Arc::new(client),
            config.vertex.vision_model.as_str(),
            config.vertex.text_model.as_str(),
        ))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn vision_model(&self) -> &str {
        &self.vision_model
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn metrics(&self) -> &RecommendationMetrics {
        &self.metrics
    }

    /// Ask the vision model about a multimodal prompt.
    ///
    /// `config.stream` picks the streaming or unary method; both produce the same
    /// text for the same answer. Fragments are concatenated without a separator.
    pub async fn recommend(
        &self,
        prompt: &Prompt,
        config: &GenerationConfig,
    ) -> Result<Recommendation> {
        let started = Instant::now();
        let result = match build_request(prompt, config, &[]) {
            Ok(request) => {
                self.call(
                    &self.vision_model,
                    &request,
                    config.stream,
                    &ResponseAggregator::concatenated(),
                )
                .await
            }
            Err(e) => Err(e),
        };
        self.finish(&self.vision_model, result, started)
    }

    /// Ask the text model about a plain prompt, with provider blocking turned off.
    /// Fragments are joined with a single space.
    pub async fn generate_text(
        &self,
        text: &str,
        config: &GenerationConfig,
    ) -> Result<Recommendation> {
        let started = Instant::now();
        let result = match build_text_request(text, config, &permissive_safety_settings()) {
            Ok(request) => {
                self.call(
                    &self.text_model,
                    &request,
                    config.stream,
                    &ResponseAggregator::spaced(),
                )
                .await
            }
            Err(e) => Err(e),
        };
        self.finish(&self.text_model, result, started)
    }

    async fn call(
        &self,
        model: &str,
        request: &GeminiRequest,
        stream: bool,
        aggregator: &ResponseAggregator,
    ) -> Result<AggregatedResponse> {
        info!(
            "{}: Generating with model: {} (stream: {})",
            self.provider.name(),
            model,
            stream
        );
        let fragments = self
            .provider
            .generate_content(model, request, stream)
            .await?;
        aggregator.aggregate_stream(fragments).await
    }

    fn finish(
        &self,
        model: &str,
        result: Result<AggregatedResponse>,
        started: Instant,
    ) -> Result<Recommendation> {
        let elapsed = started.elapsed();
        match result {
            Ok(response) => {
                self.metrics.record_success(&response, elapsed);
                let recommendation = Recommendation {
                    id: Uuid::new_v4(),
                    model: model.to_string(),
                    response,
                };
                info!(
                    id = %recommendation.id,
                    fragments = recommendation.response.fragments,
                    missing = recommendation.response.missing,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Generation complete"
                );
                Ok(recommendation)
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(model, error = %e, "Generation failed");
                Err(e)
            }
        }
    }
}
