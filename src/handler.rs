use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::RecommenderError;
use crate::metrics::MetricsSnapshot;
use crate::models::GenerationConfig;
use crate::prompt::{ContentItem, Prompt};
use crate::recommend::{Recommendation, Recommender};
use crate::scene::Scene;

const INDEX_HTML: &str = include_str!("../assets/index.html");

pub struct AppState {
    pub recommender: Recommender,
    pub scene: Scene,
    /// Used when a request does not carry its own generation config
    pub generation: GenerationConfig,
}

impl AppState {
    pub fn new(recommender: Recommender, scene: Scene, generation: GenerationConfig) -> Self {
        Self {
            recommender,
            scene,
            generation,
        }
    }

}

/// The request's config if it sent one, `default` otherwise; a top-level
/// `stream` flag wins over both.
fn resolve_config(
    config: Option<GenerationConfig>,
    stream: Option<bool>,
    default: &GenerationConfig,
) -> GenerationConfig {
    let config = config.unwrap_or_else(|| default.clone());
    match stream {
        Some(stream) => config.with_stream(stream),
        None => config,
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/scene", get(handle_scene))
        .route("/api/prompt", get(handle_prompt))
        .route("/api/recommendation", post(handle_recommendation))
        .route("/api/text", post(handle_text))
        .route("/api/metrics", get(handle_metrics))
        .with_state(state)
}

/// Body of `POST /api/recommendation`, every field optional
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub generation_config: Option<GenerationConfig>,
    #[serde(default)]
    pub stream: Option<bool>,
}

/// Body of `POST /api/text`
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub prompt: String,
    #[serde(default)]
    pub generation_config: Option<GenerationConfig>,
    #[serde(default)]
    pub stream: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub id: Uuid,
    pub model: String,
    pub response: String,
    pub prompt: Prompt,
}

#[derive(Debug, Serialize)]
pub struct PromptView {
    pub items: Prompt,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MetricsView {
    #[serde(flatten)]
    pub snapshot: MetricsSnapshot,
    pub summary: String,
}

impl RecommendationResponse {
    fn new(recommendation: Recommendation, prompt: Prompt) -> Self {
        Self {
            id: recommendation.id,
            model: recommendation.model,
            response: recommendation.response.into_text(),
            prompt,
        }
    }
}

impl RecommenderError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecommenderError::InvalidPrompt(_) | RecommenderError::InvalidGenerationConfig(_) => {
                StatusCode::BAD_REQUEST
            }
            RecommenderError::UpstreamError(_)
            | RecommenderError::UpstreamStatus { .. }
            | RecommenderError::Blocked(_)
            | RecommenderError::InvalidResponse(_)
            | RecommenderError::MissingText { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RecommenderError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.kind(), &self.to_string())
    }
}

fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    let body = json!({
        "error": {
            "type": kind,
            "message": message,
        }
    });
    (status, Json(body)).into_response()
}

/// Parse an optional JSON body; an empty body yields the default value.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, Response> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(T::default());
    }
    parse_required(body)
}

fn parse_required<T: DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("Rejected request body: {}", e);
        error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            &format!("Invalid request body: {}", e),
        )
    })
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn handle_scene(State(state): State<Arc<AppState>>) -> Json<Scene> {
    Json(state.scene.clone())
}

pub async fn handle_prompt(State(state): State<Arc<AppState>>) -> Response {
    match state.scene.prompt() {
        Ok(prompt) => {
            let text = prompt.to_string();
            Json(PromptView {
                items: prompt,
                text,
            })
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn handle_recommendation(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: RecommendationRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let config = resolve_config(request.generation_config, request.stream, &state.generation);

    let prompt = match state.scene.prompt() {
        Ok(prompt) => prompt,
        Err(e) => {
            error!("Prompt assembly failed: {}", e);
            return e.into_response();
        }
    };

    info!(
        "Recommendation requested ({} prompt items, stream: {})",
        prompt.len(),
        config.stream
    );

    match state.recommender.recommend(&prompt, &config).await {
        Ok(recommendation) => {
            Json(RecommendationResponse::new(recommendation, prompt)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn handle_text(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: TextRequest = match parse_required(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let config = resolve_config(
        request.generation_config,
        request.stream,
        &GenerationConfig::text_default(),
    );

    match state.recommender.generate_text(&request.prompt, &config).await {
        Ok(recommendation) => {
            let prompt = Prompt::from(vec![ContentItem::text(request.prompt)]);
            Json(RecommendationResponse::new(recommendation, prompt)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn handle_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsView> {
    let snapshot = state.recommender.metrics().snapshot();
    let summary = snapshot.to_string();
    Json(MetricsView { snapshot, summary })
}
