// Process configuration: credential, model identifiers and retry knobs
use crate::error::GenerationError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const MODEL_FAST: &str = "gemini-2.5-flash";
pub const MODEL_COMPLEX: &str = "gemini-3-pro-preview";
pub const MODEL_TTS: &str = "gemini-2.5-flash-preview-tts";
pub const MODEL_IMAGE_HQ: &str = "gemini-2.5-flash-image";
pub const MODEL_IMAGE_FALLBACK: &str = "imagen-3.0-generate-001";

/// Model identifiers per task
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub fast: String,
    pub complex: String,
    pub tts: String,
    pub image: String,
    pub image_fallback: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            fast: MODEL_FAST.to_string(),
            complex: MODEL_COMPLEX.to_string(),
            tts: MODEL_TTS.to_string(),
            image: MODEL_IMAGE_HQ.to_string(),
            image_fallback: MODEL_IMAGE_FALLBACK.to_string(),
        }
    }
}

/// Retry budget shared by every generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub retries: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            initial_delay: Duration::from_millis(1000),
            multiplier: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub api_key: String,
    pub base_url: String,
    pub models: ModelConfig,
    pub retry: RetryConfig,
    pub request_timeout: Duration,
}

impl StudioConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            models: ModelConfig::default(),
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Load from the process environment (and `.env` if present).
    ///
    /// A missing credential is fatal and is reported before any request is made.
    pub fn from_env() -> Result<Self, GenerationError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, GenerationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::Configuration(
                    "API key not found: set GEMINI_API_KEY (or API_KEY)".to_string(),
                )
            })?;

        let mut config = Self::new(api_key);

        if let Some(url) = lookup("GEMINI_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        let models = &mut config.models;
        for (key, slot) in [
            ("TUBEFLOW_MODEL_FAST", &mut models.fast),
            ("TUBEFLOW_MODEL_COMPLEX", &mut models.complex),
            ("TUBEFLOW_MODEL_TTS", &mut models.tts),
            ("TUBEFLOW_MODEL_IMAGE", &mut models.image),
            ("TUBEFLOW_MODEL_IMAGE_FALLBACK", &mut models.image_fallback),
        ] {
            if let Some(model) = lookup(key) {
                *slot = model;
            }
        }

        if let Some(retries) = parse_number::<u32>(&lookup, "TUBEFLOW_RETRIES")? {
            config.retry.retries = retries;
        }
        if let Some(ms) = parse_number::<u64>(&lookup, "TUBEFLOW_RETRY_DELAY_MS")? {
            config.retry.initial_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_number::<u64>(&lookup, "TUBEFLOW_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, GenerationError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            GenerationError::Configuration(format!("{} must be a number, got '{}'", key, raw))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let err = StudioConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));

        let err = StudioConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));
    }

    #[test]
    fn test_defaults() {
        let config = StudioConfig::from_lookup(lookup_from(&[("API_KEY", "secret")])).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.models, ModelConfig::default());
        assert_eq!(config.retry.retries, 3);
        assert_eq!(config.retry.initial_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_overrides() {
        let config = StudioConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_BASE_URL", "http://localhost:1234/"),
            ("TUBEFLOW_MODEL_COMPLEX", "gemini-2.5-pro"),
            ("TUBEFLOW_RETRIES", "5"),
            ("TUBEFLOW_RETRY_DELAY_MS", "10"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:1234");
        assert_eq!(config.models.complex, "gemini-2.5-pro");
        assert_eq!(config.models.fast, MODEL_FAST);
        assert_eq!(config.retry.retries, 5);
        assert_eq!(config.retry.initial_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let err = StudioConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("TUBEFLOW_RETRIES", "many"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("TUBEFLOW_RETRIES"));
    }
}
