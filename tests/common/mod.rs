#![allow(dead_code)]

use bytes::Bytes;
use furniture_recommender::{
    Recommender, RecommenderError,
    models::gemini::GeminiRequest,
    provider::{FragmentFuture, FragmentStream, Provider},
    streaming::parser::parse_fragments,
};
use futures::stream;
use std::sync::{Arc, Mutex};

/// A streamed answer in two fragments
pub const STREAMED_BODY: &str = r#"[{"candidates":[{"content":{"role":"model","parts":[{"text":"| Chair | Reason |\n"}]}}]},
{"candidates":[{"content":{"role":"model","parts":[{"text":"| Chair 4 | Matches the sofa |"}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":1300,"candidatesTokenCount":24,"totalTokenCount":1324}}]"#;

/// The same answer from the unary method
pub const UNARY_BODY: &str = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"| Chair | Reason |\n| Chair 4 | Matches the sofa |"}]},"finishReason":"STOP"}]}"#;

pub const EXPECTED_TEXT: &str = "| Chair | Reason |\n| Chair 4 | Matches the sofa |";

/// Serves canned response bodies through the real fragment parser
pub struct ScriptedProvider {
    streamed: String,
    unary: String,
    chunk_size: usize,
    /// Fail the call before any byte arrives
    status: Option<(u16, String)>,
    /// Break the connection after this many chunks
    interrupt_after: Option<usize>,
    pub calls: Mutex<Vec<(String, bool, GeminiRequest)>>,
}

impl ScriptedProvider {
    pub fn new(streamed: &str, unary: &str) -> Self {
        Self {
            streamed: streamed.to_string(),
            unary: unary.to_string(),
            chunk_size: 11,
            status: None,
            interrupt_after: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn furniture() -> Self {
        Self::new(STREAMED_BODY, UNARY_BODY)
    }

    pub fn failing(status: u16, message: &str) -> Self {
        let mut provider = Self::furniture();
        provider.status = Some((status, message.to_string()));
        provider
    }

    pub fn interrupted(body: &str, after_chunks: usize, chunk_size: usize) -> Self {
        let mut provider = Self::new(body, body);
        provider.chunk_size = chunk_size;
        provider.interrupt_after = Some(after_chunks);
        provider
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> (String, bool, GeminiRequest) {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

impl Provider for ScriptedProvider {
    fn generate_content(
        &self,
        model: &str,
        request: &GeminiRequest,
        stream: bool,
    ) -> FragmentFuture {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), stream, request.clone()));

        if let Some((status, body)) = self.status.clone() {
            return Box::pin(async move {
                Err::<FragmentStream, _>(RecommenderError::UpstreamStatus { status, body })
            });
        }

        let body = if stream { &self.streamed } else { &self.unary };
        let mut chunks: Vec<Result<Bytes, String>> = body
            .as_bytes()
            .chunks(self.chunk_size)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        if let Some(after) = self.interrupt_after {
            chunks.truncate(after);
            chunks.push(Err("connection reset by peer".to_string()));
        }

        Box::pin(async move {
            let fragments: FragmentStream = Box::pin(parse_fragments(stream::iter(chunks)));
            Ok(fragments)
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn recommender(provider: Arc<ScriptedProvider>) -> Recommender {
    Recommender::new(provider, "gemini-1.0-pro-vision", "gemini-1.0-pro")
}
