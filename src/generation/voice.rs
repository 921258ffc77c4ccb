// Voice stage: narration text -> raw PCM via the TTS model
use super::{require_non_empty, ContentStudio};
use crate::backend::GenerateRequest;
use crate::error::GenerationError;
use crate::types::{find_voice, VoiceCustomization};
use crate::utils::{strip_markup, truncate_chars};
use tracing::{info, warn};

/// TTS input limit in characters, applied to the narration before any style prefix
pub const MAX_SPEECH_CHARS: usize = 4500;

pub const VOICE_PREVIEW_TEXT: &str = "Hello! I am ready to narrate your amazing video.";

/// Clean and cap the narration, then prepend the speaking-style directive if any knob is set.
pub fn speech_text(text: &str, customization: Option<&VoiceCustomization>) -> String {
    let cleaned = strip_markup(text);
    let narration = truncate_chars(&cleaned, MAX_SPEECH_CHARS);

    let styles = customization.map(VoiceCustomization::directives).unwrap_or_default();
    if styles.is_empty() {
        narration.to_string()
    } else {
        format!("(Speaking style: {}): {}", styles.join(", "), narration)
    }
}

impl ContentStudio {
    /// Synthesize narration. Returns 16-bit mono PCM at 24 kHz as sent by the backend.
    pub async fn generate_audio(
        &self,
        text: &str,
        voice: &str,
        customization: Option<&VoiceCustomization>,
    ) -> Result<Vec<u8>, GenerationError> {
        require_non_empty("voice", voice)?;
        require_non_empty("narration text", &strip_markup(text))?;
        let input = speech_text(text, customization);

        if find_voice(voice).is_none() {
            warn!(voice = %voice, "Voice is not in the prebuilt catalogue, passing it through");
        }
        info!(voice = %voice, chars = input.chars().count(), "Generating voiceover");

        let request = GenerateRequest::speech(&self.models.tts, input, voice);
        let pcm = self.request_inline("generate_audio", request).await?;

        info!(bytes = pcm.len(), "Voiceover ready");
        Ok(pcm)
    }

    /// Short sample of a voice with the given customization
    pub async fn preview_voice(
        &self,
        voice: &str,
        customization: Option<&VoiceCustomization>,
    ) -> Result<Vec<u8>, GenerationError> {
        self.generate_audio(VOICE_PREVIEW_TEXT, voice, customization).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::ScriptedBackend;
    use crate::backend::{GenerateResponse, Modality};
    use crate::config::{ModelConfig, RetryConfig};
    use std::sync::Arc;

    fn british() -> VoiceCustomization {
        VoiceCustomization { accent: "British".into(), age: "Default".into(), pacing: "Normal".into() }
    }

    fn studio(backend: Arc<ScriptedBackend>) -> ContentStudio {
        ContentStudio::new(backend, ModelConfig::default(), RetryConfig::default())
    }

    #[test]
    fn test_style_prefix_only_for_non_neutral_knobs() {
        assert_eq!(speech_text("Hello world", Some(&british())), "(Speaking style: British accent): Hello world");
        assert_eq!(speech_text("Hello world", Some(&VoiceCustomization::default())), "Hello world");
        assert_eq!(speech_text("Hello world", None), "Hello world");
    }

    #[test]
    fn test_markup_stripped() {
        assert_eq!(speech_text("## Hook\n**Bold** _move_", None), " Hook\nBold move");
    }

    #[test]
    fn test_truncation_applies_to_narration_before_prefix() {
        let text = "w".repeat(5000);
        let out = speech_text(&text, Some(&british()));

        let prefix = "(Speaking style: British accent): ";
        assert!(out.starts_with(prefix));
        assert_eq!(out.len(), prefix.len() + MAX_SPEECH_CHARS);
    }

    #[tokio::test]
    async fn test_audio_request_shape() {
        let backend = Arc::new(ScriptedBackend::new(|_, _| {
            Ok(GenerateResponse::from_inline("audio/L16;codec=pcm;rate=24000", vec![1, 2, 3, 4]))
        }));
        let pcm = studio(backend.clone())
            .generate_audio("Hello world", "Kore", Some(&british()))
            .await
            .unwrap();

        assert_eq!(pcm, vec![1, 2, 3, 4]);
        let request = backend.last_request();
        assert_eq!(request.model, "gemini-2.5-flash-preview-tts");
        assert_eq!(request.modality, Modality::Audio);
        assert_eq!(request.voice.as_deref(), Some("Kore"));
        assert!(request.prompt.starts_with("(Speaking style: British accent): Hello world"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_only_reply_is_a_failure() {
        let backend = Arc::new(ScriptedBackend::always_text("I cannot speak"));
        let err = studio(backend.clone()).generate_audio("Hello", "Kore", None).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse(_)));
        assert_eq!(backend.content_calls(), 4);
    }

    #[tokio::test]
    async fn test_markup_only_text_rejected() {
        let backend = Arc::new(ScriptedBackend::always_text("unused"));
        let err = studio(backend.clone()).generate_audio("***", "Kore", None).await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidInput(_)));
        assert_eq!(backend.content_calls(), 0);
    }

    #[tokio::test]
    async fn test_preview_uses_sample_line() {
        let backend = Arc::new(ScriptedBackend::new(|_, _| Ok(GenerateResponse::from_inline("audio/pcm", vec![0; 8]))));
        studio(backend.clone()).preview_voice("Puck", None).await.unwrap();
        assert_eq!(backend.last_request().prompt, VOICE_PREVIEW_TEXT);
    }
}
