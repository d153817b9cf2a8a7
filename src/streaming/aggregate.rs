use futures::{Stream, StreamExt};
use std::fmt;

use super::fragment::{FragmentText, MissingText, ResponseFragment};
use crate::error::{RecommenderError, Result};

/// Reduces a sequence of response fragments into one display string
///
/// Fragment texts are joined with `separator` in arrival order. A fragment without
/// text contributes `""` but still occupies its slot, so with `" "` the sequence
/// `["This", "chair", <blocked>]` becomes `"This chair "`. In strict mode such a
/// fragment fails the aggregation instead. A fragment reporting that the prompt
/// itself was blocked always fails it with [`RecommenderError::Blocked`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseAggregator {
    separator: String,
    tolerate_missing: bool,
}

/// Progress of a single aggregation; the finished state is [`AggregatedResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationState {
    Idle,
    Accumulating,
}

/// In-flight aggregation, fed one fragment at a time
#[derive(Debug, Clone)]
pub struct Aggregation {
    separator: String,
    tolerate_missing: bool,
    output: String,
    fragments: usize,
    missing: usize,
}

/// Final aggregated text plus what it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedResponse {
    pub text: String,
    pub fragments: usize,
    pub missing: usize,
}

impl ResponseAggregator {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            tolerate_missing: true,
        }
    }

    /// Join with a single space (text model answers)
    pub fn spaced() -> Self {
        Self::new(" ")
    }

    /// Join with nothing (vision model answers)
    pub fn concatenated() -> Self {
        Self::new("")
    }

    pub fn tolerate_missing(mut self, tolerate: bool) -> Self {
        self.tolerate_missing = tolerate;
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn is_tolerant(&self) -> bool {
        self.tolerate_missing
    }

    pub fn start(&self) -> Aggregation {
        Aggregation {
            separator: self.separator.clone(),
            tolerate_missing: self.tolerate_missing,
            output: String::new(),
            fragments: 0,
            missing: 0,
        }
    }

    /// Aggregate a fallible sequence; the first upstream error is returned as-is
    /// and any text gathered before it is dropped
    pub fn aggregate<I, E>(&self, fragments: I) -> Result<AggregatedResponse>
    where
        I: IntoIterator<Item = std::result::Result<ResponseFragment, E>>,
        RecommenderError: From<E>,
    {
        let mut aggregation = self.start();
        for fragment in fragments {
            aggregation.push(&fragment?)?;
        }
        Ok(aggregation.finish())
    }

    /// Aggregate fragments that are already in memory
    pub fn aggregate_fragments<'a, I>(&self, fragments: I) -> Result<AggregatedResponse>
    where
        I: IntoIterator<Item = &'a ResponseFragment>,
    {
        let mut aggregation = self.start();
        for fragment in fragments {
            aggregation.push(fragment)?;
        }
        Ok(aggregation.finish())
    }

    /// Drain a fragment stream to completion
    pub async fn aggregate_stream<S>(&self, stream: S) -> Result<AggregatedResponse>
    where
        S: Stream<Item = Result<ResponseFragment>>,
    {
        let mut stream = std::pin::pin!(stream);
        let mut aggregation = self.start();
        while let Some(fragment) = stream.next().await {
            aggregation.push(&fragment?)?;
        }
        Ok(aggregation.finish())
    }
}

impl Default for ResponseAggregator {
    fn default() -> Self {
        Self::spaced()
    }
}

impl Aggregation {
    /// Consume one fragment and return the text it appended (separator included)
    pub fn push(&mut self, fragment: &ResponseFragment) -> Result<&str> {
        let index = self.fragments;
        let text = match fragment.text() {
            FragmentText::Text(text) => text,
            FragmentText::Missing(MissingText::PromptBlocked(reason)) => {
                return Err(RecommenderError::Blocked(reason));
            }
            FragmentText::Missing(reason) if self.tolerate_missing => {
                tracing::warn!(index, reason = %reason, "Fragment has no text, using empty string");
                self.missing += 1;
                String::new()
            }
            FragmentText::Missing(reason) => {
                return Err(RecommenderError::MissingText {
                    index,
                    reason: reason.to_string(),
                });
            }
        };

        let start = self.output.len();
        if index > 0 {
            self.output.push_str(&self.separator);
        }
        self.output.push_str(&text);
        self.fragments += 1;

        tracing::debug!(index, bytes = text.len(), "Aggregated fragment");
        Ok(&self.output[start..])
    }

    pub fn state(&self) -> AggregationState {
        if self.fragments == 0 {
            AggregationState::Idle
        } else {
            AggregationState::Accumulating
        }
    }

    /// Text aggregated so far
    pub fn text(&self) -> &str {
        &self.output
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    pub fn missing(&self) -> usize {
        self.missing
    }

    pub fn finish(self) -> AggregatedResponse {
        AggregatedResponse {
            text: self.output,
            fragments: self.fragments,
            missing: self.missing,
        }
    }
}

impl AggregatedResponse {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for AggregatedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
