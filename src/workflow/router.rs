// Router - stage gating and which operation each stage runs
use super::state::{Stage, WorkflowState};

/// The generation step behind a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOperation {
    VideoIdea,
    Script,
    Audio,
    VisualPrompts,
    Seo,
    ThumbnailConcepts,
    ThumbnailImages,
    Schedule,
}

pub fn operation_for(stage: Stage) -> Option<StageOperation> {
    match stage {
        Stage::IdeaGeneration => Some(StageOperation::VideoIdea),
        Stage::ScriptWriting => Some(StageOperation::Script),
        Stage::VoiceOver => Some(StageOperation::Audio),
        Stage::PromptWriting => Some(StageOperation::VisualPrompts),
        Stage::SeoOptimization => Some(StageOperation::Seo),
        Stage::ThumbnailDesign => Some(StageOperation::ThumbnailConcepts),
        Stage::ThumbnailGeneration => Some(StageOperation::ThumbnailImages),
        Stage::ContentPlanning => Some(StageOperation::Schedule),
        Stage::FinalReview => None,
    }
}

/// Why `stage` cannot be approved, or `None` when it can
pub fn approval_blocker(state: &WorkflowState, stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::IdeaGeneration => match &state.idea.result {
            None => Some("no idea generated"),
            Some(idea) if is_blank(&idea.title) || is_blank(&idea.concept) => Some("idea is incomplete"),
            Some(_) => None,
        },
        Stage::ScriptWriting if is_blank(&state.script.script) => Some("script is empty"),
        Stage::VoiceOver if state.voice.audio.as_ref().map_or(true, |a| a.is_empty()) => {
            Some("no voiceover generated")
        }
        Stage::PromptWriting if all_blank(&state.prompts.prompts) => Some("no visual prompts"),
        Stage::SeoOptimization => match &state.seo.result {
            None => Some("no SEO metadata"),
            Some(seo) if is_blank(&seo.title) => Some("SEO title is empty"),
            Some(_) => None,
        },
        Stage::ThumbnailDesign if state.thumbnails.selected_concept().is_none() => {
            Some("no thumbnail concept selected")
        }
        Stage::ThumbnailGeneration if state.thumbnail_images.images.iter().all(|i| i.is_empty()) => {
            Some("no thumbnail images")
        }
        Stage::ContentPlanning if all_blank(&state.plan.schedule) => Some("no launch schedule"),
        Stage::FinalReview => Some("final stage"),
        _ => None,
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// True for an empty list too
fn all_blank(items: &[String]) -> bool {
    items.iter().all(|item| is_blank(item))
}

pub fn can_approve(state: &WorkflowState, stage: Stage) -> bool {
    approval_blocker(state, stage).is_none()
}

/// A stage is reachable once every earlier stage has been approved
pub fn can_enter(state: &WorkflowState, stage: Stage) -> bool {
    Stage::ALL[..stage.index()].iter().all(|s| state.is_approved(*s))
}

/// Whether entering the current stage should kick off generation on its own.
///
/// Only SEO (nothing generated yet) and thumbnail images (concept chosen, no
/// images yet) start automatically. Revisiting a stage with output never does.
pub fn should_auto_generate(state: &WorkflowState) -> bool {
    match state.current {
        Stage::SeoOptimization => state.seo.result.is_none(),
        Stage::ThumbnailGeneration => {
            state.thumbnails.selected_concept().is_some() && state.thumbnail_images.images.is_empty()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SeoMetadata, ThumbnailConcept, VideoIdea};

    #[test]
    fn test_every_stage_but_the_last_has_an_operation() {
        for stage in Stage::ALL {
            assert_eq!(operation_for(stage).is_some(), !stage.is_final());
        }
    }

    #[test]
    fn test_approval_conditions() {
        let mut state = WorkflowState::default();
        assert!(!can_approve(&state, Stage::IdeaGeneration));
        state.idea.result = Some(VideoIdea { title: "Grow Food Anywhere".into(), concept: "Rooftop plots.".into() });
        assert!(can_approve(&state, Stage::IdeaGeneration));

        state.script.script = "   ".into();
        assert!(!can_approve(&state, Stage::ScriptWriting));

        state.voice.audio = Some(vec![]);
        assert!(!can_approve(&state, Stage::VoiceOver));
        state.voice.audio = Some(vec![0, 1]);
        assert!(can_approve(&state, Stage::VoiceOver));

        state.thumbnails.concepts = vec![ThumbnailConcept {
            headline: "h".into(),
            visual_description: "v".into(),
            reasoning: "r".into(),
        }];
        assert!(!can_approve(&state, Stage::ThumbnailDesign));
        state.thumbnails.selected = Some(0);
        assert!(can_approve(&state, Stage::ThumbnailDesign));

        assert!(!can_approve(&state, Stage::FinalReview));
    }

    #[test]
    fn test_blank_results_do_not_pass_the_gate() {
        let mut state = WorkflowState::default();
        state.idea.result = Some(VideoIdea::default());
        assert_eq!(approval_blocker(&state, Stage::IdeaGeneration), Some("idea is incomplete"));
        state.idea.result = Some(VideoIdea { title: "Title".into(), concept: " ".into() });
        assert!(!can_approve(&state, Stage::IdeaGeneration));

        state.prompts.prompts = vec!["".into(), "  ".into()];
        assert!(!can_approve(&state, Stage::PromptWriting));
        state.prompts.prompts.push("Drone shot over rooftops".into());
        assert!(can_approve(&state, Stage::PromptWriting));

        state.seo.result = Some(SeoMetadata::default());
        assert!(!can_approve(&state, Stage::SeoOptimization));
        state.seo.result = Some(SeoMetadata { title: "Rooftop Farming".into(), ..SeoMetadata::default() });
        assert!(can_approve(&state, Stage::SeoOptimization));

        state.plan.schedule = vec![String::new()];
        assert!(!can_approve(&state, Stage::ContentPlanning));
        state.plan.schedule = vec!["T-0: Publish".into()];
        assert!(can_approve(&state, Stage::ContentPlanning));
    }

    #[test]
    fn test_can_enter_needs_prior_approvals() {
        let mut state = WorkflowState::default();
        assert!(can_enter(&state, Stage::IdeaGeneration));
        assert!(!can_enter(&state, Stage::ScriptWriting));
        state.idea.approved = true;
        assert!(can_enter(&state, Stage::ScriptWriting));
        assert!(!can_enter(&state, Stage::VoiceOver));
    }

    #[test]
    fn test_auto_generation_on_entry() {
        let mut state = WorkflowState { current: Stage::SeoOptimization, ..WorkflowState::default() };
        assert!(should_auto_generate(&state));
        state.seo.result = Some(SeoMetadata::default());
        assert!(!should_auto_generate(&state));

        state.current = Stage::ThumbnailGeneration;
        assert!(!should_auto_generate(&state));
        state.thumbnails.concepts = vec![ThumbnailConcept {
            headline: "h".into(),
            visual_description: "v".into(),
            reasoning: "r".into(),
        }];
        state.thumbnails.selected = Some(0);
        assert!(should_auto_generate(&state));
        state.thumbnail_images.images = vec![vec![1]];
        assert!(!should_auto_generate(&state));

        state.current = Stage::IdeaGeneration;
        assert!(!should_auto_generate(&state));
    }
}
