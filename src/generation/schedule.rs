// Plan stage: launch checklist working back from the publish slot
use super::{non_blank, require_non_empty, ContentStudio};
use crate::backend::GenerateRequest;
use crate::error::GenerationError;
use crate::types::PublishSlot;
use tracing::info;

pub const SCHEDULE_SYSTEM_INSTRUCTION: &str = "You are a Content Manager Agent. Create a reverse-chronological checklist for a YouTube video launch (e.g., T-3 days: Finalize Thumbnail, T-0: Hit Publish, T+1 hour: Reply to comments). Return a JSON array of strings.";

pub fn schedule_prompt(
    title: &str,
    slot: &PublishSlot,
    feedback: Option<&str>,
    previous: &[String],
) -> String {
    let mut prompt = format!(
        "Video Title: {}\nTarget Publish Date: {} at {}\n\n",
        title,
        slot.date_label(),
        slot.time_label()
    );

    match non_blank(feedback) {
        Some(feedback) if !previous.is_empty() => {
            prompt.push_str("Previous Schedule:\n");
            for step in previous {
                prompt.push_str(&format!("- {}\n", step));
            }
            prompt.push_str(&format!(
                "\nUser Feedback: {}\n\nRevise the checklist based on the feedback. Return a list of strings.",
                feedback
            ));
        }
        _ => prompt.push_str(
            "Generate a production checklist and social media promotion schedule leading up to this date. Return a list of strings.",
        ),
    }

    prompt
}

impl ContentStudio {
    pub async fn generate_schedule(
        &self,
        title: &str,
        slot: &PublishSlot,
        feedback: Option<&str>,
        previous: &[String],
    ) -> Result<Vec<String>, GenerationError> {
        require_non_empty("title", title)?;
        info!(date = %slot.date_label(), time = %slot.time_label(), "Generating launch schedule");

        let request = GenerateRequest::text(&self.models.fast, schedule_prompt(title, slot, feedback, previous))
            .with_system(SCHEDULE_SYSTEM_INSTRUCTION);
        let schedule: Vec<String> = self.request_structured("generate_schedule", request).await?;

        info!(steps = schedule.len(), "Launch schedule ready");
        Ok(schedule)
    }
}
