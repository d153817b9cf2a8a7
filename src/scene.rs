use serde::Serialize;

use crate::error::Result;
use crate::prompt::{CHAIR_ROLES, PromptBuilder, ROOM_ROLE, display_url};

const ROOM_URI: &str = "gs://github-repo/img/gemini/retail-recommendations/rooms/living_room.jpeg";
const CHAIR_URIS: [&str; 4] = [
    "gs://github-repo/img/gemini/retail-recommendations/furnitures/chair1.jpeg",
    "gs://github-repo/img/gemini/retail-recommendations/furnitures/chair2.jpeg",
    "gs://github-repo/img/gemini/retail-recommendations/furnitures/chair3.jpeg",
    "gs://github-repo/img/gemini/retail-recommendations/furnitures/chair4.jpeg",
];

/// The images shown on the page and bound into the prompt
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub room: SceneImage,
    pub chairs: Vec<SceneImage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneImage {
    pub role: String,
    pub uri: String,
    pub display_url: String,
    pub caption: String,
}

impl SceneImage {
    fn new(role: &str, uri: &str, caption: String) -> Self {
        Self {
            role: role.to_string(),
            uri: uri.to_string(),
            display_url: display_url(uri),
            caption,
        }
    }
}

impl Scene {
    /// A living room and four chairs from the public sample bucket
    pub fn living_room() -> Self {
        let chairs = CHAIR_ROLES
            .iter()
            .zip(CHAIR_URIS)
            .enumerate()
            .map(|(i, (role, uri))| SceneImage::new(role, uri, format!("Chair {}", i + 1)))
            .collect();

        Self {
            room: SceneImage::new(ROOM_ROLE, ROOM_URI, "Image of a living room".to_string()),
            chairs,
        }
    }

    pub fn prompt_builder(&self) -> PromptBuilder {
        PromptBuilder::new()
            .image(self.room.role.as_str(), self.room.uri.as_str())
            .images(
                self.chairs
                    .iter()
                    .map(|c| (c.role.as_str(), c.uri.as_str())),
            )
    }

    pub fn prompt(&self) -> Result<crate::prompt::Prompt> {
        self.prompt_builder().build()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::living_room()
    }
}
