pub mod request;
pub mod validation;

pub use request::*;
pub use validation::*;

use crate::models::gemini::{HarmBlockThreshold, HarmCategory, SafetySetting};

/// Turn off provider-side blocking for the four configurable harm categories.
///
/// Used for free-form text prompts; the furniture prompt sends no safety settings
/// and gets the provider defaults.
pub fn permissive_safety_settings() -> Vec<SafetySetting> {
    [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: HarmBlockThreshold::BlockNone,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_safety_settings() {
        let settings = permissive_safety_settings();
        assert_eq!(settings.len(), 4);
        assert!(
            settings
                .iter()
                .all(|s| s.threshold == HarmBlockThreshold::BlockNone)
        );
        assert!(
            settings
                .iter()
                .any(|s| s.category == HarmCategory::SexuallyExplicit)
        );
    }
}
