use crate::backend::{GenerateRequest, GenerateResponse, GenerationBackend, ImagenRequest, InlinePayload, Modality};
use crate::config::StudioConfig;
use crate::error::GenerationError;
use crate::utils::preview;
use async_trait::async_trait;
use base64::prelude::*;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// The credential travels in this header, never in the URL
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini / Imagen REST client. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    request_timeout: Duration,
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(Value),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String, // base64 encoded data
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}

impl GenerateContentRequest {
    /// Translate a backend-neutral request into the REST body
    pub fn from_request(request: &GenerateRequest) -> Self {
        let mut config = GenerationConfig::default();

        if let Some(schema) = &request.response_schema {
            config.response_mime_type = Some("application/json".to_string());
            config.response_schema = Some(schema.clone());
        }

        match request.modality {
            Modality::Text => {}
            Modality::Audio => {
                config.response_modalities = Some(vec!["AUDIO".to_string()]);
                if let Some(voice) = &request.voice {
                    config.speech_config = Some(serde_json::json!({
                        "voiceConfig": {
                            "prebuiltVoiceConfig": { "voiceName": voice }
                        }
                    }));
                }
            }
            Modality::Image => {
                config.response_modalities = Some(vec!["TEXT".to_string(), "IMAGE".to_string()]);
                if let Some(ratio) = &request.aspect_ratio {
                    config.image_config = Some(serde_json::json!({ "aspectRatio": ratio }));
                }
            }
        }

        let has_config = config.response_mime_type.is_some() || config.response_modalities.is_some();

        Self {
            contents: vec![Content {
                parts: vec![Part::Text { text: request.prompt.clone() }],
                role: Some("user".to_string()),
            }],
            system_instruction: request.system_instruction.as_ref().map(|s| Content {
                parts: vec![Part::Text { text: s.clone() }],
                role: None,
            }),
            generation_config: has_config.then_some(config),
        }
    }
}

impl GenerateContentResponse {
    /// Collapse the first candidate into text + decoded inline payloads
    pub fn into_response(self) -> Result<GenerateResponse, GenerationError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Ok(GenerateResponse {
                finish_reason: block_reason.map(|r| format!("BLOCKED: {}", r)),
                ..Default::default()
            });
        };

        let mut text = String::new();
        let mut inline_data = Vec::new();
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            match part {
                Part::Text { text: t } => text.push_str(&t),
                Part::InlineData { inline_data: d } => inline_data.push(InlinePayload {
                    mime_type: d.mime_type,
                    data: BASE64_STANDARD.decode(d.data.as_bytes())?,
                }),
                Part::Other(_) => {}
            }
        }

        Ok(GenerateResponse {
            text: (!text.is_empty()).then_some(text),
            inline_data,
            finish_reason: candidate.finish_reason,
        })
    }
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let config = StudioConfig::new(api_key);
        Self::from_config(&config)
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
        }
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::debug!("Gemini API error ({}): {}", status, preview(&response_text, 500));
            return Err(GenerationError::from_http(status.as_u16(), &response_text));
        }

        tracing::debug!("Gemini API response (truncated): {}", preview(&response_text, 500));
        Ok(response_text)
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate_content(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let body = serde_json::to_value(GenerateContentRequest::from_request(&request))?;

        tracing::debug!(
            model = %request.model,
            modality = ?request.modality,
            prompt_chars = request.prompt.chars().count(),
            "Gemini generateContent request"
        );

        let response_text = self.post_json(&url, &body).await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&response_text).map_err(|e| {
            GenerationError::MalformedResponse(format!("error decoding response body: {}", e))
        })?;

        parsed.into_response()
    }

    async fn generate_images(&self, request: ImagenRequest) -> Result<Vec<Vec<u8>>, GenerationError> {
        let url = format!("{}/models/{}:predict", self.base_url, request.model);
        let body = serde_json::json!({
            "instances": [{ "prompt": request.prompt }],
            "parameters": {
                "sampleCount": request.number_of_images,
                "aspectRatio": request.aspect_ratio,
                "outputOptions": { "mimeType": request.output_mime_type }
            }
        });

        tracing::debug!(model = %request.model, "Imagen predict request");

        let response_text = self.post_json(&url, &body).await?;
        let parsed: PredictResponse = serde_json::from_str(&response_text)?;

        let mut images = Vec::with_capacity(parsed.predictions.len());
        for prediction in parsed.predictions {
            if let Some(data) = prediction.bytes_base64_encoded {
                images.push(BASE64_STANDARD.decode(data.as_bytes())?);
            }
        }

        if images.is_empty() {
            return Err(GenerationError::EmptyResponse("No image data in Imagen response".to_string()));
        }
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
        let mut config = StudioConfig::new("test-key");
        config.base_url = server.url();
        GeminiClient::from_config(&config)
    }

    #[test]
    fn test_structured_request_body() {
        let request = GenerateRequest::text("gemini-2.5-flash", "hi".into())
            .with_system("be brief")
            .with_schema(serde_json::json!({"type": "OBJECT"}));
        let body = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_speech_and_image_request_bodies() {
        let speech = GenerateRequest::speech("tts", "Hello".into(), "Kore");
        let body = serde_json::to_value(GenerateContentRequest::from_request(&speech)).unwrap();
        assert_eq!(body["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Kore"
        );

        let plain = GenerateRequest::text("m", "x".into());
        let body = serde_json::to_value(GenerateContentRequest::from_request(&plain)).unwrap();
        assert!(body.get("generationConfig").is_none());

        let image = GenerateRequest::image("img", "cat".into(), "16:9");
        let body = serde_json::to_value(GenerateContentRequest::from_request(&image)).unwrap();
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
    }

    #[test]
    fn test_response_parsing_safety_block() {
        let json = r#"{ "candidates": [ { "finishReason": "SAFETY", "index": 0 } ] }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let response = parsed.into_response().unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.finish_reason.as_deref(), Some("SAFETY"));
    }

    #[test]
    fn test_response_parsing_inline_and_thought_parts() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        { "thoughtSignature": "abc" },
                        { "text": "Here you go" },
                        { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } }
                    ],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let response = parsed.into_response().unwrap();
        assert_eq!(response.text(), Some("Here you go"));
        assert_eq!(response.first_inline().unwrap().data, b"hello".to_vec());
    }

    #[tokio::test]
    async fn test_generate_content_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"ok"}],"role":"model"},"finishReason":"STOP"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let response = client
            .generate_content(GenerateRequest::text("gemini-2.5-flash", "ping".into()))
            .await
            .unwrap();

        assert_eq!(response.text(), Some("ok"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transport_errors_do_not_carry_the_key() {
        let mut config = StudioConfig::new("SUPER-SECRET-KEY");
        config.base_url = "http://127.0.0.1:1".into();
        let client = GeminiClient::from_config(&config);

        let err = client
            .generate_content(GenerateRequest::text("gemini-2.5-flash", "ping".into()))
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert!(!err.to_string().contains("SUPER-SECRET-KEY"));
        assert!(!format!("{:?}", err).contains("SUPER-SECRET-KEY"));
    }

    #[tokio::test]
    async fn test_generate_content_permission_denied_is_tagged() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.5-flash-image:generateContent")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"Permission denied on resource","status":"PERMISSION_DENIED"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .generate_content(GenerateRequest::image("gemini-2.5-flash-image", "cat".into(), "16:9"))
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[tokio::test]
    async fn test_generate_content_overloaded_is_transient() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body(r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .generate_content(GenerateRequest::text("gemini-2.5-flash", "x".into()))
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_imagen_predict() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/imagen-3.0-generate-001:predict")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "parameters": { "sampleCount": 1, "aspectRatio": "16:9" }
            })))
            .with_status(200)
            .with_body(r#"{"predictions":[{"bytesBase64Encoded":"aW1n","mimeType":"image/jpeg"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let images = client
            .generate_images(ImagenRequest {
                model: "imagen-3.0-generate-001".into(),
                prompt: "cat".into(),
                number_of_images: 1,
                aspect_ratio: "16:9".into(),
                output_mime_type: "image/jpeg".into(),
            })
            .await
            .unwrap();

        assert_eq!(images, vec![b"img".to_vec()]);
        mock.assert_async().await;
    }
}
