use std::fmt;

use crate::models::gemini::{Candidate, GeminiContent, GeminiPart, GenerateContentResponse};

/// Finish reasons that mean the provider withheld the candidate's content
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// One unit of model output as it arrived from the provider
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFragment {
    response: GenerateContentResponse,
}

/// Result of pulling text out of a single fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentText {
    Text(String),
    Missing(MissingText),
}

/// Why a fragment carried no text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingText {
    /// The provider sent an empty candidate list
    NoCandidates,
    /// The prompt itself was rejected; carries the block reason
    PromptBlocked(String),
    /// The candidate was suppressed; carries the finish reason
    Blocked(String),
    /// A candidate without any text part (finish-only or non-text parts)
    EmptyContent,
}

impl ResponseFragment {
    pub fn new(response: GenerateContentResponse) -> Self {
        Self { response }
    }

    /// A fragment with a single text part, as a model would stream it
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(GeminiContent {
                    role: Some("model".to_string()),
                    parts: vec![GeminiPart::Text { text: text.into() }],
                }),
                ..Default::default()
            }],
            ..Default::default()
        })
    }

    /// A fragment with no candidates at all
    pub fn empty() -> Self {
        Self::new(GenerateContentResponse::default())
    }

    pub fn response(&self) -> &GenerateContentResponse {
        &self.response
    }

    pub fn into_response(self) -> GenerateContentResponse {
        self.response
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }

    /// Extract the text of the first candidate.
    ///
    /// All text parts of that candidate are concatenated; non-text parts are ignored.
    /// Additional candidates are not read.
    pub fn text(&self) -> FragmentText {
        if let Some(reason) = self
            .response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return FragmentText::Missing(MissingText::PromptBlocked(reason.clone()));
        }

        let Some(candidate) = self.response.candidates.first() else {
            return FragmentText::Missing(MissingText::NoCandidates);
        };

        let mut texts = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(GeminiPart::as_text)
            .peekable();

        if texts.peek().is_none() {
            return match candidate.finish_reason.as_deref() {
                Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason) => {
                    FragmentText::Missing(MissingText::Blocked(reason.to_string()))
                }
                _ => FragmentText::Missing(MissingText::EmptyContent),
            };
        }

        FragmentText::Text(texts.collect())
    }
}

impl From<GenerateContentResponse> for ResponseFragment {
    fn from(response: GenerateContentResponse) -> Self {
        Self::new(response)
    }
}

impl FragmentText {
    pub fn is_missing(&self) -> bool {
        matches!(self, FragmentText::Missing(_))
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            FragmentText::Text(text) => Some(text),
            FragmentText::Missing(_) => None,
        }
    }
}

impl fmt::Display for MissingText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingText::NoCandidates => write!(f, "no candidates"),
            MissingText::PromptBlocked(reason) => write!(f, "prompt blocked ({})", reason),
            MissingText::Blocked(reason) => write!(f, "candidate blocked ({})", reason),
            MissingText::EmptyContent => write!(f, "candidate has no text"),
        }
    }
}
