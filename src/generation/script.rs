// Script stage: long-form narration, routed pro -> flash on any failure
use super::{non_blank, require_non_empty, ContentStudio};
use crate::backend::GenerateRequest;
use crate::error::GenerationError;
use crate::types::{ScriptBrief, VideoIdea};
use crate::utils::truncate_with_marker;
use tracing::info;

/// Prior script characters kept as refinement context
pub const SCRIPT_CONTEXT_CHARS: usize = 5000;

pub fn script_system_instruction(tone: &str) -> String {
    format!(
        "You are a Professional Documentary Screenwriter for YouTube. \
You specialize in high-retention, long-form content (video essays, deep dives, masterclasses).

RULES FOR LENGTH & DEPTH:
1. Your primary goal is VOLUME and DEPTH.
2. Never write \"Discuss X\". Instead, actually write the full speech discussing X in detail.
3. Use analogies, metaphors, and storytelling to elaborate on points.
4. If a section feels short, add a \"For example...\" or \"Imagine this...\" paragraph.
5. Write in a natural, spoken rhythm, but keep talking.
6. When explaining a concept, assume the audience needs a detailed breakdown.
7. Tone: {}.",
        tone
    )
}

pub fn script_prompt(
    brief: &ScriptBrief,
    idea: &VideoIdea,
    feedback: Option<&str>,
    previous: Option<&str>,
) -> String {
    let target = brief.length.target();
    let mut prompt = format!(
        "Video Title: {}\nConcept: {}\nTarget Length: {}\nMinimum Word Count: {} words\nNiche: {}\nTone: {}\n\n",
        idea.title, idea.concept, brief.length, target.min_words, brief.niche, brief.tone
    );

    match (non_blank(feedback), previous.filter(|p| !p.trim().is_empty())) {
        (Some(feedback), Some(previous)) => {
            prompt.push_str(&format!(
                "Current Script Context: {}\nUser Feedback: {}\n\nRewrite or adjust the script based on this feedback. Ensure the length requirements are still met.",
                truncate_with_marker(previous, SCRIPT_CONTEXT_CHARS),
                feedback
            ));
        }
        _ => {
            prompt.push_str(&format!(
                "Write a comprehensive, deep-dive YouTube script.

CRITICAL LENGTH INSTRUCTION:
The user requested a LONG video ({length}).
You MUST generate at least {words} words of spoken narration.
Do NOT summarize. Do NOT use bullet points for speaking parts.
EXPAND every concept into multiple paragraphs.
For every key point, provide a detailed real-world example or case study.
Explain the 'Why' and 'How' in depth, not just the 'What'.
Avoid brevity. Be verbose, descriptive, and thorough.

Structure Requirements:
1. **Hook (0:00-2:00)**: A long, engaging story or problem statement to grab attention.
2. **Intro**: Detailed value proposition and what to expect.
3. **Deep Dive Body ({sections} distinct sections)**:
   - For EACH section, provide:
     - A theoretical explanation (2-3 paragraphs).
     - A real-world example or case study (invent one if needed but make it realistic and detailed).
     - A \"How-to\" or practical application step.
     - A counter-argument or common pitfall.
4. **Conclusion**: Extensive summary and strong Call to Action.

Format the output with Markdown headers.",
                length = brief.length,
                words = target.min_words,
                sections = target.sections
            ));
        }
    }

    prompt
}

impl ContentStudio {
    /// Generate (or refine) the script. Tries the complex model with a full
    /// retry budget, then the fast model with its own budget on any failure.
    pub async fn generate_script(
        &self,
        brief: &ScriptBrief,
        idea: &VideoIdea,
        feedback: Option<&str>,
        previous: Option<&str>,
    ) -> Result<String, GenerationError> {
        require_non_empty("idea title", &idea.title)?;
        require_non_empty("niche", &brief.niche)?;

        let prompt = script_prompt(brief, idea, feedback, previous);
        let system = script_system_instruction(&brief.tone);
        info!(length = %brief.length, min_words = brief.length.target().min_words, "Generating script");

        let script = self
            .script_router
            .run(|route| {
                let request = GenerateRequest::text(&route.model, prompt.clone()).with_system(system.clone());
                async move { self.request_text("generate_script", request).await }
            })
            .await?;

        info!(chars = script.chars().count(), "Script ready");
        Ok(script)
    }
}
