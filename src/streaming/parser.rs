use crate::error::{RecommenderError, Result};
use crate::models::gemini::{ApiErrorEnvelope, GenerateContentResponse};
use bytes::{Buf, Bytes, BytesMut};
use futures::{Stream, StreamExt, stream};
use serde::Deserialize;
use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;

use super::fragment::ResponseFragment;

/// An element of the streamed array: a response chunk, or an error the
/// provider emitted after the HTTP status was already sent
#[derive(Deserialize)]
#[serde(untagged)]
enum StreamItem {
    Error(ApiErrorEnvelope),
    Chunk(GenerateContentResponse),
}

/// Stateful parser for the chunked JSON array returned by `streamGenerateContent`
///
/// Network chunks do not line up with JSON objects; bytes are buffered until a
/// complete top-level object is available.
pub struct StreamingJsonParser {
    buffer: BytesMut,
}

impl StreamingJsonParser {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
        }
    }

    /// Feed new data and extract complete response objects
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<GenerateContentResponse>> {
        self.buffer.extend_from_slice(chunk);
        self.extract_objects()
    }

    /// Bytes still waiting for the rest of their object
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn extract_objects(&mut self) -> Result<Vec<GenerateContentResponse>> {
        let mut results = Vec::new();

        loop {
            self.skip_noise();

            if self.buffer.is_empty() {
                break;
            }

            if self.buffer[0] == b']' {
                self.buffer.advance(1);
                continue;
            }

            if let Some(obj_end) = self.find_object_boundary() {
                let obj_bytes = self.buffer.split_to(obj_end);

                match serde_json::from_slice::<StreamItem>(&obj_bytes) {
                    Ok(StreamItem::Chunk(chunk)) => results.push(chunk),
                    Ok(StreamItem::Error(envelope)) => {
                        return Err(RecommenderError::UpstreamStatus {
                            status: envelope.error.code,
                            body: envelope.error.message,
                        });
                    }
                    Err(e) => {
                        // Still counts as a fragment so later separators stay aligned
                        tracing::warn!(
                            error = %e,
                            raw = %String::from_utf8_lossy(&obj_bytes),
                            "Unparsable response chunk, treating it as empty"
                        );
                        results.push(GenerateContentResponse::default());
                    }
                }
            } else {
                // Incomplete object, wait for more data
                break;
            }
        }

        Ok(results)
    }

    fn skip_noise(&mut self) {
        while !self.buffer.is_empty() {
            match self.buffer[0] {
                b'[' | b',' | b' ' | b'\n' | b'\r' | b'\t' => {
                    self.buffer.advance(1);
                }
                _ => break,
            }
        }
    }

    fn find_object_boundary(&self) -> Option<usize> {
        let mut depth = 0;
        let mut in_string = false;
        let mut escaped = false;

        for (i, &byte) in self.buffer.iter().enumerate() {
            if in_string {
                if escaped {
                    escaped = false;
                } else {
                    match byte {
                        b'\\' => escaped = true,
                        b'"' => in_string = false,
                        _ => {}
                    }
                }
            } else {
                match byte {
                    b'"' => in_string = true,
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(i + 1);
                        }
                    }
                    _ => {}
                }
            }
        }

        None
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        if self.buffer.capacity() > 65536 {
            self.buffer = BytesMut::with_capacity(8192);
        }
    }
}

impl Default for StreamingJsonParser {
    fn default() -> Self {
        Self::new()
    }
}

struct FragmentState<S> {
    bytes: Pin<Box<S>>,
    parser: StreamingJsonParser,
    ready: VecDeque<ResponseFragment>,
    finished: bool,
}

/// Turn a raw response body into a stream of fragments.
///
/// Works for both the streamed JSON array and a unary single-object body. A
/// transport error ends the stream with `UpstreamError`; a body that stops in the
/// middle of an object ends it with `InvalidResponse`.
pub fn parse_fragments<S, E>(bytes: S) -> impl Stream<Item = Result<ResponseFragment>> + Send
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: fmt::Display + Send,
{
    let state = FragmentState {
        bytes: Box::pin(bytes),
        parser: StreamingJsonParser::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.ready.pop_front() {
                return Some((Ok(fragment), state));
            }
            if state.finished {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => match state.parser.feed(&chunk) {
                    Ok(parsed) => state
                        .ready
                        .extend(parsed.into_iter().map(ResponseFragment::new)),
                    Err(e) => {
                        state.finished = true;
                        return Some((Err(e), state));
                    }
                },
                Some(Err(e)) => {
                    state.finished = true;
                    let err = RecommenderError::UpstreamError(format!("Stream interrupted: {}", e));
                    return Some((Err(err), state));
                }
                None => {
                    state.finished = true;
                    let pending = state.parser.pending();
                    if pending > 0 {
                        let err = RecommenderError::InvalidResponse(format!(
                            "Response ended with {} unparsed bytes",
                            pending
                        ));
                        return Some((Err(err), state));
                    }
                }
            }
        }
    })
}
