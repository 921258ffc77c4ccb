// Visual prompt stage: script -> platform-tuned image/video prompts
use super::{non_blank, require_non_empty, ContentStudio};
use crate::backend::GenerateRequest;
use crate::error::GenerationError;
use crate::types::{PromptBrief, VideoPlatform};
use crate::utils::truncate_chars;
use tracing::info;

pub const PROMPT_SCRIPT_CHARS: usize = 3000;

pub fn prompts_system_instruction(platform: VideoPlatform) -> String {
    format!(
        "You are a Generative Video Prompt Engineer Agent. You are an expert in prompting for {}. \
Include details about camera angles, lighting, style (photorealistic, cinematic, etc.), and motion. \
Return a JSON array of strings.",
        platform
    )
}

pub fn prompts_prompt(
    brief: &PromptBrief,
    script: &str,
    feedback: Option<&str>,
    previous: &[String],
) -> String {
    let mut prompt = format!(
        "Platform: {}\nNumber of Prompts: {}\n\nBased on the following script, generate optimized image/video generation prompts to visualize the key scenes.\n\nScript Context: {}... (truncated for context)\n\n",
        brief.platform,
        brief.count,
        truncate_chars(script, PROMPT_SCRIPT_CHARS)
    );

    if let Some(feedback) = non_blank(feedback) {
        if !previous.is_empty() {
            let listed = serde_json::to_string(previous).unwrap_or_default();
            prompt.push_str(&format!(
                "Previous Prompts: {}\nUser Feedback: {}\n\nRegenerate prompts based on feedback.",
                listed, feedback
            ));
        }
    }

    prompt
}

impl ContentStudio {
    pub async fn generate_prompts(
        &self,
        brief: &PromptBrief,
        script: &str,
        feedback: Option<&str>,
        previous: &[String],
    ) -> Result<Vec<String>, GenerationError> {
        require_non_empty("script", script)?;
        if brief.count == 0 {
            return Err(GenerationError::InvalidInput("prompt count must be at least 1".to_string()));
        }
        info!(platform = %brief.platform, count = brief.count, "Generating visual prompts");

        let request = GenerateRequest::text(&self.models.fast, prompts_prompt(brief, script, feedback, previous))
            .with_system(prompts_system_instruction(brief.platform));
        let prompts: Vec<String> = self.request_structured("generate_prompts", request).await?;

        info!(returned = prompts.len(), "Visual prompts ready");
        Ok(prompts)
    }
}
