use bytes::Bytes;
use reqwest::Client;
use tracing::{info, warn};

use crate::config::VertexConfig;
use crate::error::{RecommenderError, Result};
use crate::models::gemini::{ApiErrorEnvelope, GeminiRequest};
use crate::provider::{FragmentFuture, FragmentStream, Provider};
use crate::streaming::parser::parse_fragments;

/// Gemini models served by Vertex AI
pub struct VertexClient {
    client: Client,
    config: VertexConfig,
}

impl VertexClient {
    pub fn new(config: VertexConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RecommenderError::InternalError(format!("Failed to create HTTP client: {}", e))
            })?;

        if config.access_token.is_none() {
            warn!("No GCP access token configured, Vertex AI will reject requests");
        }

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &VertexConfig {
        &self.config
    }
}

impl Provider for VertexClient {
    fn generate_content(
        &self,
        model: &str,
        request: &GeminiRequest,
        stream: bool,
    ) -> FragmentFuture {
        let method = if stream {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        let url = self.config.model_url(model, method);
        let body = serde_json::to_vec(request).map(Bytes::from);
        let client = self.client.clone();
        let access_token = self.config.access_token.clone();

        Box::pin(async move {
            Self::generate_content_impl(url, body?, client, access_token).await
        })
    }

    fn name(&self) -> &str {
        "Vertex AI"
    }
}

impl VertexClient {
    async fn generate_content_impl(
        url: String,
        body: Bytes,
        client: Client,
        access_token: Option<String>,
    ) -> Result<FragmentStream> {
        info!("Vertex AI: Sending {} bytes to: {}", body.len(), url);

        let mut request = client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body);
        if let Some(token) = &access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            RecommenderError::UpstreamError(format!("Vertex AI request failed: {}", e))
        })?;

        let status = response.status();
        info!("Vertex AI responded with status: {}", status);

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecommenderError::UpstreamStatus {
                status: status.as_u16(),
                body: error_message(&error_body),
            });
        }

        Ok(Box::pin(parse_fragments(response.bytes_stream())))
    }
}

/// Pull the human-readable message out of a Google error body.
///
/// Error responses to streaming calls arrive wrapped in a one-element array.
fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    let envelope = serde_json::from_str::<ApiErrorEnvelope>(trimmed)
        .ok()
        .or_else(|| {
            serde_json::from_str::<Vec<ApiErrorEnvelope>>(trimmed)
                .ok()
                .and_then(|envelopes| envelopes.into_iter().next())
        });

    match envelope {
        Some(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => trimmed.to_string(),
    }
}
