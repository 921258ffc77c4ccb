// Generation backend boundary: what the operations send and what they get back.
// The HTTP implementation lives in gemini_client.rs.
use crate::error::GenerationError;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Text,
    Audio,
    Image,
}

/// One `generateContent` call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: Option<String>,
    /// JSON schema for structured output; implies `application/json`
    pub response_schema: Option<Value>,
    pub modality: Modality,
    /// Prebuilt voice name for speech output
    pub voice: Option<String>,
    pub aspect_ratio: Option<String>,
}

impl GenerateRequest {
    pub fn text(model: &str, prompt: String) -> Self {
        Self {
            model: model.to_string(),
            prompt,
            system_instruction: None,
            response_schema: None,
            modality: Modality::Text,
            voice: None,
            aspect_ratio: None,
        }
    }

    pub fn speech(model: &str, text: String, voice: &str) -> Self {
        Self {
            modality: Modality::Audio,
            voice: Some(voice.to_string()),
            ..Self::text(model, text)
        }
    }

    pub fn image(model: &str, prompt: String, aspect_ratio: &str) -> Self {
        Self {
            modality: Modality::Image,
            aspect_ratio: Some(aspect_ratio.to_string()),
            ..Self::text(model, prompt)
        }
    }

    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlinePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    /// Concatenated text parts of the first candidate
    pub text: Option<String>,
    pub inline_data: Vec<InlinePayload>,
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn from_inline(mime_type: &str, data: Vec<u8>) -> Self {
        Self {
            inline_data: vec![InlinePayload {
                mime_type: mime_type.to_string(),
                data,
            }],
            ..Default::default()
        }
    }

    /// Non-blank text payload, if any
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn first_inline(&self) -> Option<&InlinePayload> {
        self.inline_data.iter().find(|p| !p.data.is_empty())
    }

    pub fn describe_empty(&self) -> String {
        format!(
            "finish reason: {}",
            self.finish_reason.as_deref().unwrap_or("UNKNOWN")
        )
    }
}

/// Classic image model request (`:predict`)
#[derive(Debug, Clone, PartialEq)]
pub struct ImagenRequest {
    pub model: String,
    pub prompt: String,
    pub number_of_images: u32,
    pub aspect_ratio: String,
    pub output_mime_type: String,
}

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate_content(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, GenerationError>;

    async fn generate_images(&self, request: ImagenRequest) -> Result<Vec<Vec<u8>>, GenerationError>;
}
