// Executor - owns one session's state and drives the generation steps
use super::router::{operation_for, should_auto_generate, StageOperation};
use super::state::{Stage, StageUpdate, WorkflowError, WorkflowState};
use crate::export::ContentPackage;
use crate::generation::ContentStudio;
use std::mem;
use tracing::{info, info_span, Instrument, Span};
use uuid::Uuid;

/// A single user's walk through the nine stages.
///
/// The session is the only writer of its [`WorkflowState`]. Generation
/// results are applied only after the operation succeeded, so a failed or
/// abandoned call leaves the state exactly as it was.
pub struct WorkflowSession {
    id: Uuid,
    studio: ContentStudio,
    state: WorkflowState,
    span: Span,
}

impl WorkflowSession {
    pub fn new(studio: ContentStudio, state: WorkflowState) -> Self {
        let id = Uuid::new_v4();
        let span = info_span!("workflow_session", session_id = %id);
        span.in_scope(|| info!(stage = %state.current, "Workflow session started"));

        Self { id, studio, state, span }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn into_state(self) -> WorkflowState {
        self.state
    }

    pub fn current_stage(&self) -> Stage {
        self.state.current
    }

    /// Apply a user edit to a stage that has been reached
    pub fn edit(&mut self, update: StageUpdate) -> Result<(), WorkflowError> {
        self.state.validate(&update)?;
        let state = mem::take(&mut self.state);
        self.state = state.apply_validated(update);
        Ok(())
    }

    pub fn approve(&mut self) -> Result<Stage, WorkflowError> {
        let _guard = self.span.enter();
        self.state.check_approve()?;

        let approved = self.state.current;
        let state = mem::take(&mut self.state);
        self.state = state.approve_validated();

        info!(approved = %approved, next = %self.state.current, "Stage approved");
        Ok(self.state.current)
    }

    pub fn go_to(&mut self, stage: Stage) -> Result<(), WorkflowError> {
        if stage > self.state.current {
            return Err(WorkflowError::NotReached { from: self.state.current, to: stage });
        }
        self.state.current = stage;
        Ok(())
    }

    /// Run the current stage's operation once, on entry, if its lifecycle asks for it.
    /// Returns whether generation ran.
    pub async fn enter_stage(&mut self) -> Result<bool, WorkflowError> {
        if !should_auto_generate(&self.state) {
            return Ok(false);
        }
        self.generate(None).await?;
        Ok(true)
    }

    /// Run the current stage's operation and store its result.
    ///
    /// `feedback` turns the call into a refinement of the stage's previous
    /// output where that stage supports it.
    pub async fn generate(&mut self, feedback: Option<&str>) -> Result<(), WorkflowError> {
        let stage = self.state.current;
        let operation = operation_for(stage).ok_or(WorkflowError::NoOperation(stage))?;

        let span = self.span.clone();
        let update = async {
            info!(stage = %stage, agent = stage.agent_name(), refining = feedback.is_some(), "Running stage");
            self.run_operation(operation, feedback).await
        }
        .instrument(span)
        .await?;

        self.state.validate(&update)?;
        let state = mem::take(&mut self.state);
        self.state = state.apply_validated(update);
        Ok(())
    }

    /// Sample the currently configured voice
    pub async fn preview_voice(&self) -> Result<Vec<u8>, WorkflowError> {
        let voice = &self.state.voice;
        let sample = self
            .studio
            .preview_voice(&voice.voice, Some(&voice.customization))
            .instrument(self.span.clone())
            .await?;
        Ok(sample)
    }

    /// Final package projection of the current state
    pub fn package(&self) -> ContentPackage {
        ContentPackage::from_state(&self.state)
    }

    async fn run_operation(
        &self,
        operation: StageOperation,
        feedback: Option<&str>,
    ) -> Result<StageUpdate, WorkflowError> {
        let state = &self.state;
        let studio = &self.studio;

        let update = match operation {
            StageOperation::VideoIdea => {
                let idea = studio
                    .generate_video_idea(&state.idea.topic, feedback, state.idea.result.as_ref())
                    .await?;
                StageUpdate::Idea(idea)
            }
            StageOperation::Script => {
                let idea = state.idea.result.as_ref().ok_or(WorkflowError::MissingInput("video idea"))?;
                let previous = Some(state.script.script.as_str()).filter(|s| !s.is_empty());
                let script = studio.generate_script(&state.script.brief, idea, feedback, previous).await?;
                StageUpdate::Script(script)
            }
            StageOperation::Audio => {
                let voice = &state.voice;
                let pcm = studio
                    .generate_audio(state.narration_text(), &voice.voice, Some(&voice.customization))
                    .await?;
                StageUpdate::Audio(pcm)
            }
            StageOperation::VisualPrompts => {
                let prompts = studio
                    .generate_prompts(&state.prompts.brief, &state.script.script, feedback, &state.prompts.prompts)
                    .await?;
                StageUpdate::Prompts(prompts)
            }
            StageOperation::Seo => {
                let seo = studio
                    .generate_seo(&state.script.script, &state.prompts.prompts, feedback, state.seo.result.as_ref())
                    .await?;
                StageUpdate::Seo(seo)
            }
            StageOperation::ThumbnailConcepts => {
                let title = state.working_title().ok_or(WorkflowError::MissingInput("video title"))?;
                let concepts = studio
                    .generate_thumbnail_concepts(title, &state.script.script, feedback)
                    .await?;
                StageUpdate::Concepts(concepts)
            }
            StageOperation::ThumbnailImages => {
                let concept = state.thumbnails.selected_concept().ok_or(WorkflowError::NoConceptSelected)?;
                let images = studio.generate_thumbnail_images(concept).await?;
                StageUpdate::ThumbnailImages(images)
            }
            StageOperation::Schedule => {
                let title = state.working_title().ok_or(WorkflowError::MissingInput("video title"))?;
                let slot = state.plan.slot.as_ref().ok_or(WorkflowError::MissingInput("publish date and time"))?;
                let schedule = studio
                    .generate_schedule(title, slot, feedback, &state.plan.schedule)
                    .await?;
                StageUpdate::Schedule(schedule)
            }
        };

        Ok(update)
    }
}
