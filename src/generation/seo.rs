// SEO stage: title, description and tags
use super::{non_blank, require_non_empty, ContentStudio};
use crate::backend::GenerateRequest;
use crate::error::GenerationError;
use crate::types::SeoMetadata;
use crate::utils::{preview, truncate_chars};
use tracing::info;

pub const SEO_SCRIPT_CHARS: usize = 2000;
const SEO_VISUAL_HINTS: usize = 3;

pub const SEO_SYSTEM_INSTRUCTION: &str = "You are a YouTube SEO Expert Agent. You understand keywords, search intent, and the YouTube algorithm. Your titles should be punchy and keyword-rich. Descriptions should be structured with timestamps placeholders if applicable. Tags should be high-volume keywords. Return JSON.";

pub fn seo_prompt(
    script: &str,
    prompts: &[String],
    feedback: Option<&str>,
    previous: Option<&SeoMetadata>,
) -> String {
    let mut prompt = format!("Script Context: {}...\n\n", truncate_chars(script, SEO_SCRIPT_CHARS));

    if !prompts.is_empty() {
        prompt.push_str("Planned Visuals:\n");
        for scene in prompts.iter().take(SEO_VISUAL_HINTS) {
            prompt.push_str(&format!("- {}\n", preview(scene, 200)));
        }
        prompt.push('\n');
    }

    match (non_blank(feedback), previous) {
        (Some(feedback), Some(previous)) => {
            prompt.push_str(&format!(
                "Previous Title: {}\nPrevious Tags: {}\nUser Feedback: {}\n\nRefine the SEO metadata.",
                previous.title,
                previous.tags.join(", "),
                feedback
            ));
        }
        _ => prompt.push_str("Analyze the content and generate the ultimate SEO metadata package to rank #1 on YouTube."),
    }

    prompt
}

impl ContentStudio {
    pub async fn generate_seo(
        &self,
        script: &str,
        prompts: &[String],
        feedback: Option<&str>,
        previous: Option<&SeoMetadata>,
    ) -> Result<SeoMetadata, GenerationError> {
        require_non_empty("script", script)?;
        info!(visual_prompts = prompts.len(), "Generating SEO metadata");

        let request = GenerateRequest::text(&self.models.fast, seo_prompt(script, prompts, feedback, previous))
            .with_system(SEO_SYSTEM_INSTRUCTION);
        let seo: SeoMetadata = self.request_structured("generate_seo", request).await?;

        info!(title = %seo.title, tags = seo.tags.len(), "SEO metadata ready");
        Ok(seo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::ScriptedBackend;
    use crate::config::{ModelConfig, RetryConfig};
    use std::sync::Arc;

    #[test]
    fn test_script_capped_at_2000_chars() {
        let prompt = seo_prompt(&"z".repeat(2100), &[], None, None);
        assert!(prompt.starts_with(&format!("Script Context: {}...\n\n", "z".repeat(2000))));
        assert!(prompt.contains("rank #1 on YouTube"));
        assert!(!prompt.contains("Planned Visuals"));
    }

    #[test]
    fn test_only_first_prompts_listed() {
        let prompts: Vec<String> = (1..=5).map(|i| format!("scene {}", i)).collect();
        let prompt = seo_prompt("script", &prompts, None, None);
        assert!(prompt.contains("- scene 3\n"));
        assert!(!prompt.contains("scene 4"));
    }

    #[tokio::test]
    async fn test_seo_output_feeds_back_into_refinement() {
        let backend = Arc::new(ScriptedBackend::always_text(
            r#"{"title":"Rooftop Farming 101","description":"00:00 Intro","tags":["gardening","urban"]}"#,
        ));
        let studio = ContentStudio::new(backend.clone(), ModelConfig::default(), RetryConfig::default());

        let seo = studio.generate_seo("script", &[], None, None).await.unwrap();
        assert_eq!(seo.tags, vec!["gardening", "urban"]);

        studio.generate_seo("script", &[], Some("shorter title"), Some(&seo)).await.unwrap();
        let prompt = backend.last_request().prompt;
        assert!(prompt.contains("Previous Title: Rooftop Farming 101"));
        assert!(prompt.contains("Previous Tags: gardening, urban"));
        assert!(prompt.contains("User Feedback: shorter title"));
    }
}
