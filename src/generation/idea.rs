// Idea stage: topic -> {title, concept}
use super::{non_blank, require_non_empty, ContentStudio};
use crate::backend::GenerateRequest;
use crate::error::GenerationError;
use crate::types::VideoIdea;
use tracing::info;

pub const IDEA_SYSTEM_INSTRUCTION: &str = "You are a YouTube Strategy Agent. Your goal is to generate viral, high-CTR video ideas. Focus on curiosity gaps, clear value propositions, and trending formats. Return JSON.";

/// Build the idea prompt. Refinement only applies when both feedback and a prior idea exist.
pub fn idea_prompt(topic: &str, feedback: Option<&str>, previous: Option<&VideoIdea>) -> String {
    let mut prompt = format!("User Topic: {}\n\n", topic);

    match (non_blank(feedback), previous) {
        (Some(feedback), Some(previous)) => {
            prompt.push_str(&format!(
                "Previous Title: {}\nPrevious Concept: {}\n\nUser Feedback to improve: {}\n\nRefine the idea based on the feedback.",
                previous.title, previous.concept, feedback
            ));
        }
        _ => prompt.push_str(
            "Generate a high-viral potential YouTube video title and a brief concept summary (2-3 sentences).",
        ),
    }

    prompt
}

impl ContentStudio {
    pub async fn generate_video_idea(
        &self,
        topic: &str,
        feedback: Option<&str>,
        previous: Option<&VideoIdea>,
    ) -> Result<VideoIdea, GenerationError> {
        require_non_empty("topic", topic)?;
        info!(topic = %topic, refining = previous.is_some() && non_blank(feedback).is_some(), "Generating video idea");

        let request = GenerateRequest::text(&self.models.fast, idea_prompt(topic, feedback, previous))
            .with_system(IDEA_SYSTEM_INSTRUCTION);
        let idea: VideoIdea = self.request_structured("generate_video_idea", request).await?;

        info!(title = %idea.title, "Video idea ready");
        Ok(idea)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::ScriptedBackend;
    use crate::backend::GenerateResponse;
    use crate::backend::Modality;
    use crate::config::{ModelConfig, RetryConfig};
    use std::sync::Arc;

    fn studio(backend: Arc<ScriptedBackend>) -> ContentStudio {
        ContentStudio::new(backend, ModelConfig::default(), RetryConfig::default())
    }

    #[test]
    fn test_first_call_prompt() {
        let prompt = idea_prompt("urban gardening", None, None);
        assert!(prompt.starts_with("User Topic: urban gardening\n\n"));
        assert!(prompt.contains("high-viral potential"));
    }

    #[test]
    fn test_feedback_without_prior_idea_is_a_first_call() {
        let prompt = idea_prompt("urban gardening", Some("make it funnier"), None);
        assert!(!prompt.contains("User Feedback"));
    }

    #[test]
    fn test_refinement_prompt_carries_prior_idea() {
        let previous = VideoIdea { title: "Grow Up".into(), concept: "Farms on balconies.".into() };
        let prompt = idea_prompt("urban gardening", Some("make it funnier"), Some(&previous));
        assert!(prompt.contains("Previous Title: Grow Up"));
        assert!(prompt.contains("Previous Concept: Farms on balconies."));
        assert!(prompt.contains("User Feedback to improve: make it funnier"));
    }

    #[tokio::test]
    async fn test_idea_round_trip_refinement() {
        let backend = Arc::new(ScriptedBackend::new(|n, _| {
            Ok(GenerateResponse::from_text(if n == 1 {
                r#"{"title":"Grow Food Anywhere","concept":"A tour of rooftop plots."}"#
            } else {
                r#"{"title":"My Tomatoes Pay Rent","concept":"A comedy tour of rooftop plots."}"#
            }))
        }));
        let studio = studio(backend.clone());

        let first = studio.generate_video_idea("urban gardening", None, None).await.unwrap();
        let refined = studio
            .generate_video_idea("urban gardening", Some("make it funnier"), Some(&first))
            .await
            .unwrap();

        assert!(!refined.concept.is_empty());
        let request = backend.last_request();
        assert_eq!(request.model, "gemini-2.5-flash");
        assert_eq!(request.modality, Modality::Text);
        assert!(request.response_schema.is_some());
        assert!(request.prompt.contains("Previous Title: Grow Food Anywhere"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparseable_reply_is_retried_then_surfaces() {
        let backend = Arc::new(ScriptedBackend::always_text("not json"));
        let err = studio(backend.clone()).generate_video_idea("cats", None, None).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
        assert_eq!(backend.content_calls(), 4);
    }

    #[tokio::test]
    async fn test_blank_topic_rejected_before_any_call() {
        let backend = Arc::new(ScriptedBackend::always_text("{}"));
        let err = studio(backend.clone()).generate_video_idea("  ", None, None).await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidInput(_)));
        assert_eq!(backend.content_calls(), 0);
    }
}
