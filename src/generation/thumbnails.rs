// Thumbnail stages: concept ideation and the three-way image fan-out
use super::{non_blank, require_non_empty, ContentStudio};
use crate::backend::{GenerateRequest, ImagenRequest};
use crate::error::GenerationError;
use crate::orchestration::{fan_out, Tier};
use crate::types::ThumbnailConcept;
use crate::utils::truncate_chars;
use tracing::info;

pub const CONCEPT_SCRIPT_CHARS: usize = 1000;

/// Concurrent image attempts per concept
pub const THUMBNAIL_VARIATIONS: usize = 3;

pub const THUMBNAIL_ASPECT_RATIO: &str = "16:9";
const FALLBACK_MIME_TYPE: &str = "image/jpeg";

pub const CONCEPT_SYSTEM_INSTRUCTION: &str = "You are a YouTube Thumbnail Strategy Agent. You focus on high contrast, emotional expressions, and curiosity gaps. Keep text overlays under 5 words. Return JSON.";

pub fn concepts_prompt(title: &str, script: &str, feedback: Option<&str>) -> String {
    let mut prompt = format!(
        "Video Title: {}\nScript Summary: {}...\n\n",
        title,
        truncate_chars(script, CONCEPT_SCRIPT_CHARS)
    );

    if let Some(feedback) = non_blank(feedback) {
        prompt.push_str(&format!("User Feedback for revision: {}\n\n", feedback));
    }

    prompt.push_str(
        "Generate 3-5 high-CTR thumbnail concepts. For each, provide a 'headline' (text on image), \
'visualDescription' (what to see), and 'reasoning' (why it works).",
    );
    prompt
}

/// Photorealistic render prompt for one concept
pub fn thumbnail_image_prompt(concept: &ThumbnailConcept) -> String {
    format!(
        "Generate a high-end, photorealistic YouTube Thumbnail.

Visual Content: {visual}

Text Overlay Requirement: The text \"{headline}\" must be clearly visible.

STYLE GUIDE (STRICT):
- PHOTOREALISTIC: Use raw photography style, not illustration or 3D render style.
- Camera: Shot on Phase One XF IQ4 150MP, 50mm Prime Lens.
- Lighting: Professional studio lighting, rim lighting, volumetric fog, high contrast, dramatic shadows.
- Details: Ultra-detailed skin texture, realistic eyes, natural hair, 8K textures.
- Composition: Rule of thirds, depth of field (bokeh background), dynamic angle.
- Color: Cinematic color grading, teal and orange look, high dynamic range (HDR).
- NEGATIVE: Do not use cartoon, anime, drawing, painting, blurry, low resolution, distorted faces, bad text.

Make it look like a trending viral YouTube video thumbnail from a top creator.",
        visual = concept.visual_description,
        headline = concept.headline
    )
}

impl ContentStudio {
    pub async fn generate_thumbnail_concepts(
        &self,
        title: &str,
        script: &str,
        feedback: Option<&str>,
    ) -> Result<Vec<ThumbnailConcept>, GenerationError> {
        require_non_empty("title", title)?;
        info!(title = %title, "Generating thumbnail concepts");

        let request = GenerateRequest::text(&self.models.fast, concepts_prompt(title, script, feedback))
            .with_system(CONCEPT_SYSTEM_INSTRUCTION);
        let concepts: Vec<ThumbnailConcept> =
            self.request_structured("generate_thumbnail_concepts", request).await?;

        info!(concepts = concepts.len(), "Thumbnail concepts ready");
        Ok(concepts)
    }

    /// Render [`THUMBNAIL_VARIATIONS`] images of one concept concurrently.
    ///
    /// Each attempt runs its own router/retrier tree: the rich image model
    /// first, the classic image model if that is permission-denied. Failed
    /// attempts are dropped, so the result holds 0 to 3 images in attempt
    /// order. Only an unusable concept is an error.
    pub async fn generate_thumbnail_images(
        &self,
        concept: &ThumbnailConcept,
    ) -> Result<Vec<Vec<u8>>, GenerationError> {
        if concept.visual_description.trim().is_empty() && concept.headline.trim().is_empty() {
            return Err(GenerationError::InvalidInput(
                "thumbnail concept has neither headline nor visual description".to_string(),
            ));
        }

        let prompt = thumbnail_image_prompt(concept);
        info!(headline = %concept.headline, variations = THUMBNAIL_VARIATIONS, "Generating thumbnail images");

        let images = fan_out("generate_thumbnail_images", THUMBNAIL_VARIATIONS, |_| {
            let prompt = prompt.clone();
            async move {
                self.image_router
                    .run(|route| {
                        let prompt = prompt.clone();
                        async move {
                            match route.tier {
                                Tier::Primary => {
                                    let request =
                                        GenerateRequest::image(&route.model, prompt, THUMBNAIL_ASPECT_RATIO);
                                    self.request_inline("thumbnail_image", request).await
                                }
                                Tier::Fallback => {
                                    let request = ImagenRequest {
                                        model: route.model,
                                        prompt,
                                        number_of_images: 1,
                                        aspect_ratio: THUMBNAIL_ASPECT_RATIO.to_string(),
                                        output_mime_type: FALLBACK_MIME_TYPE.to_string(),
                                    };
                                    self.request_imagen("thumbnail_image_fallback", request).await
                                }
                            }
                        }
                    })
                    .await
            }
        })
        .await;

        Ok(images)
    }
}
