//! Multimodal prompt assembly.
//!
//! A [`Prompt`] is the literal, ordered list of parts sent to the model. Position
//! matters: the model grounds "chair 2:" on the image that immediately follows it,
//! so items are never reordered after construction.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{RecommenderError, Result};

pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

const GCS_SCHEME: &str = "gs://";
const GCS_PUBLIC_HOST: &str = "https://storage.googleapis.com/";

/// One unit of a multimodal prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentItem {
    Text(String),
    ImageRef(ImageRef),
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        ContentItem::Text(text.into())
    }

    pub fn image(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        ContentItem::ImageRef(ImageRef {
            uri: uri.into(),
            mime_type: mime_type.into(),
        })
    }

    pub fn as_image(&self) -> Option<&ImageRef> {
        match self {
            ContentItem::ImageRef(image) => Some(image),
            ContentItem::Text(_) => None,
        }
    }
}

/// An image the model fetches by URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub uri: String,
    pub mime_type: String,
}

impl ImageRef {
    /// Browser-reachable URL for the image.
    ///
    /// `gs://bucket/path` maps to the public Cloud Storage host; any other URI is
    /// returned unchanged.
    pub fn display_url(&self) -> String {
        display_url(&self.uri)
    }
}

pub fn display_url(uri: &str) -> String {
    match uri.strip_prefix(GCS_SCHEME) {
        Some(path) => format!("{}{}", GCS_PUBLIC_HOST, path),
        None => uri.to_string(),
    }
}

/// Ordered sequence of content items for a single model request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Prompt {
    items: Vec<ContentItem>,
}

impl Prompt {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageRef> {
        self.items.iter().filter_map(ContentItem::as_image)
    }

    pub fn into_items(self) -> Vec<ContentItem> {
        self.items
    }
}

impl From<Vec<ContentItem>> for Prompt {
    fn from(items: Vec<ContentItem>) -> Self {
        Self::new(items)
    }
}

impl<'a> IntoIterator for &'a Prompt {
    type Item = &'a ContentItem;
    type IntoIter = std::slice::Iter<'a, ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Plain-text rendering used by the "Prompt" tab
impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match item {
                ContentItem::Text(text) => writeln!(f, "{}", text)?,
                ContentItem::ImageRef(image) => {
                    writeln!(f, "[image {} ({})]", image.uri, image.mime_type)?
                }
            }
        }
        Ok(())
    }
}

/// A step of a prompt template: fixed text or the image bound to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Text(&'static str),
    Image(&'static str),
}

pub const ROOM_ROLE: &str = "room";
pub const CHAIR_ROLES: [&str; 4] = ["chair_1", "chair_2", "chair_3", "chair_4"];

/// Chairs first, then the room, then the answer format
pub const FURNITURE_TEMPLATE: &[Segment] = &[
    Segment::Text("Consider the following chairs:"),
    Segment::Text("chair 1:"),
    Segment::Image("chair_1"),
    Segment::Text("chair 2:"),
    Segment::Image("chair_2"),
    Segment::Text("chair 3:"),
    Segment::Image("chair_3"),
    Segment::Text("and"),
    Segment::Text("chair 4:"),
    Segment::Image("chair_4"),
    Segment::Text(
        "\nFor each chair, explain why it would be suitable or not suitable for the following room:",
    ),
    Segment::Image(ROOM_ROLE),
    Segment::Text(
        "Only recommend for the room provided and not other rooms. Provide your recommendation in a table format with chair name and reason as columns.",
    ),
];

/// Builds a [`Prompt`] by binding image URIs to the roles of a template
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    images: BTreeMap<String, String>,
    mime_type: String,
    template: &'static [Segment],
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            images: BTreeMap::new(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            template: FURNITURE_TEMPLATE,
        }
    }

    pub fn with_template(mut self, template: &'static [Segment]) -> Self {
        self.template = template;
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Bind `uri` to a role; a later call for the same role replaces the earlier one
    pub fn image(mut self, role: impl Into<String>, uri: impl Into<String>) -> Self {
        self.images.insert(role.into(), uri.into());
        self
    }

    pub fn images<K, V>(mut self, images: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (role, uri) in images {
            self.images.insert(role.into(), uri.into());
        }
        self
    }

    /// Produce the prompt in template order.
    ///
    /// Every role the template references must be bound to a non-empty URI. The URI
    /// itself is not parsed; a bad one surfaces as an upstream error.
    pub fn build(&self) -> Result<Prompt> {
        let mut items = Vec::with_capacity(self.template.len());

        for segment in self.template {
            match *segment {
                Segment::Text(text) => items.push(ContentItem::text(text)),
                Segment::Image(role) => {
                    let uri = self.images.get(role).map(String::as_str).unwrap_or("");
                    if uri.trim().is_empty() {
                        return Err(RecommenderError::InvalidPrompt(format!(
                            "No image provided for role '{}'",
                            role
                        )));
                    }
                    items.push(ContentItem::image(uri, self.mime_type.as_str()));
                }
            }
        }

        for role in self.images.keys() {
            let used = self
                .template
                .iter()
                .any(|segment| matches!(segment, Segment::Image(r) if *r == role.as_str()));
            if !used {
                tracing::debug!(role = %role, "Image role not used by template");
            }
        }

        Ok(Prompt::new(items))
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
