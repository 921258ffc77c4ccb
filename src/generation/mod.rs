//! Generation operations, one module per workflow stage.
//!
//! Every operation is a method on [`ContentStudio`]: it builds a prompt from
//! typed inputs, sends it through the [`Retrier`] (and a [`ModelRouter`] for
//! script and thumbnail images) and parses the reply into a typed result.
//! Operations never touch workflow state; callers apply the results.

pub mod idea;
pub mod prompts;
pub mod schedule;
pub mod script;
pub mod seo;
pub mod structured;
pub mod thumbnails;
pub mod voice;

use crate::backend::{GenerateRequest, GenerationBackend, ImagenRequest};
use crate::config::{ModelConfig, RetryConfig, StudioConfig};
use crate::error::GenerationError;
use crate::gemini_client::GeminiClient;
use crate::orchestration::{FallbackTrigger, ModelRouter, Retrier};
use std::sync::Arc;

pub use structured::StructuredOutput;

#[derive(Clone)]
pub struct ContentStudio {
    backend: Arc<dyn GenerationBackend>,
    models: ModelConfig,
    retrier: Retrier,
    script_router: ModelRouter,
    image_router: ModelRouter,
}

impl ContentStudio {
    pub fn new(backend: Arc<dyn GenerationBackend>, models: ModelConfig, retry: RetryConfig) -> Self {
        // Script falls back on anything; images only when the rich model is not permitted
        let script_router = ModelRouter::new(
            "script",
            models.complex.clone(),
            models.fast.clone(),
            FallbackTrigger::AnyFailure,
        );
        let image_router = ModelRouter::new(
            "thumbnail_image",
            models.image.clone(),
            models.image_fallback.clone(),
            FallbackTrigger::PermissionDenied,
        );

        Self {
            backend,
            models,
            retrier: Retrier::new(retry),
            script_router,
            image_router,
        }
    }

    /// Studio backed by the Gemini REST client
    pub fn from_config(config: &StudioConfig) -> Self {
        let client = GeminiClient::from_config(config);
        Self::new(Arc::new(client), config.models.clone(), config.retry)
    }

    pub fn models(&self) -> &ModelConfig {
        &self.models
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retrier.config()
    }

    /// Retried call whose reply must carry non-blank text
    async fn request_text(
        &self,
        label: &'static str,
        request: GenerateRequest,
    ) -> Result<String, GenerationError> {
        self.retrier
            .run(label, || {
                let request = request.clone();
                async move {
                    let response = self.backend.generate_content(request).await?;
                    response.text().map(str::to_string).ok_or_else(|| {
                        GenerationError::EmptyResponse(format!(
                            "No response from AI ({})",
                            response.describe_empty()
                        ))
                    })
                }
            })
            .await
    }

    /// Retried structured-output call; parsing and validation happen inside the retry
    async fn request_structured<T: StructuredOutput>(
        &self,
        label: &'static str,
        request: GenerateRequest,
    ) -> Result<T, GenerationError> {
        let request = request.with_schema(T::schema());
        self.retrier
            .run(label, || {
                let request = request.clone();
                async move {
                    let response = self.backend.generate_content(request).await?;
                    let text = response.text().ok_or_else(|| {
                        GenerationError::EmptyResponse(format!(
                            "No response from AI ({})",
                            response.describe_empty()
                        ))
                    })?;
                    structured::parse::<T>(text)
                }
            })
            .await
    }

    /// Retried call whose reply must carry inline binary data (audio or image)
    async fn request_inline(
        &self,
        label: &'static str,
        request: GenerateRequest,
    ) -> Result<Vec<u8>, GenerationError> {
        self.retrier
            .run(label, || {
                let request = request.clone();
                async move {
                    let response = self.backend.generate_content(request).await?;
                    match response.first_inline() {
                        Some(payload) => Ok(payload.data.clone()),
                        None => Err(GenerationError::EmptyResponse(format!(
                            "No inline data in response ({})",
                            response.describe_empty()
                        ))),
                    }
                }
            })
            .await
    }

    /// Retried classic image model call, first image only
    async fn request_imagen(
        &self,
        label: &'static str,
        request: ImagenRequest,
    ) -> Result<Vec<u8>, GenerationError> {
        self.retrier
            .run(label, || {
                let request = request.clone();
                async move {
                    let images = self.backend.generate_images(request).await?;
                    images
                        .into_iter()
                        .find(|img| !img.is_empty())
                        .ok_or_else(|| GenerationError::EmptyResponse("No image bytes returned".to_string()))
                }
            })
            .await
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), GenerationError> {
    if value.trim().is_empty() {
        return Err(GenerationError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Feedback only counts when it carries text
fn non_blank(feedback: Option<&str>) -> Option<&str> {
    feedback.map(str::trim).filter(|f| !f.is_empty())
}
