use crate::error::{RecommenderError, Result};
use crate::models::GenerationConfig;

pub const MAX_OUTPUT_TOKENS: u32 = 8192;

/// Validate generation options before they reach the provider
pub fn validate_generation_config(config: &GenerationConfig) -> Result<()> {
    if let Some(max_tokens) = config.max_output_tokens
        && (max_tokens == 0 || max_tokens > MAX_OUTPUT_TOKENS)
    {
        return Err(RecommenderError::InvalidGenerationConfig(format!(
            "Invalid max_output_tokens: {}. Must be between 1 and {}",
            max_tokens, MAX_OUTPUT_TOKENS
        )));
    }

    if let Some(temp) = config.temperature
        && !(0.0..=2.0).contains(&temp)
    {
        return Err(RecommenderError::InvalidGenerationConfig(format!(
            "Invalid temperature: {}. Must be between 0.0 and 2.0",
            temp
        )));
    }

    if let Some(top_p) = config.top_p
        && !(0.0..=1.0).contains(&top_p)
    {
        return Err(RecommenderError::InvalidGenerationConfig(format!(
            "Invalid top_p: {}. Must be between 0.0 and 1.0",
            top_p
        )));
    }

    if let Some(top_k) = config.top_k
        && top_k == 0
    {
        return Err(RecommenderError::InvalidGenerationConfig(
            "Invalid top_k: 0. Must be greater than 0".into(),
        ));
    }

    if let Some(count) = config.candidate_count
        && count == 0
    {
        return Err(RecommenderError::InvalidGenerationConfig(
            "Invalid candidate_count: 0. Must be at least 1".into(),
        ));
    }

    if let Some(stops) = &config.stop_sequences
        && stops.iter().any(|s| s.is_empty())
    {
        return Err(RecommenderError::InvalidGenerationConfig(
            "Stop sequences cannot be empty".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_generation_config(&GenerationConfig::vision_default()).is_ok());
        assert!(validate_generation_config(&GenerationConfig::text_default()).is_ok());
    }

    #[test]
    fn test_invalid_max_output_tokens() {
        let mut config = GenerationConfig::vision_default();

        config.max_output_tokens = Some(0);
        assert!(validate_generation_config(&config).is_err());

        config.max_output_tokens = Some(MAX_OUTPUT_TOKENS + 1);
        let err = validate_generation_config(&config).unwrap_err();
        assert!(err.to_string().contains("max_output_tokens"));

        config.max_output_tokens = Some(MAX_OUTPUT_TOKENS);
        assert!(validate_generation_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_sampling_parameters() {
        let mut config = GenerationConfig::text_default();
        config.temperature = Some(-0.1);
        assert!(validate_generation_config(&config).is_err());

        let mut config = GenerationConfig::text_default();
        config.top_p = Some(1.5);
        assert!(validate_generation_config(&config).is_err());

        let mut config = GenerationConfig::text_default();
        config.top_k = Some(0);
        assert!(validate_generation_config(&config).is_err());

        let mut config = GenerationConfig::text_default();
        config.candidate_count = Some(0);
        assert!(validate_generation_config(&config).is_err());
    }

    #[test]
    fn test_empty_stop_sequence() {
        let mut config = GenerationConfig::text_default();
        config.stop_sequences = Some(vec!["END".to_string(), String::new()]);
        let err = validate_generation_config(&config).unwrap_err();
        assert!(err.to_string().contains("Stop sequences"));
    }
}
