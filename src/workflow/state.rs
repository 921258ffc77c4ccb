// WorkflowState - the accumulated session data, one record per stage
use crate::error::GenerationError;
use crate::types::{
    PromptBrief, PublishSlot, ScriptBrief, SeoMetadata, ThumbnailConcept, VideoIdea, VoiceCustomization,
    DEFAULT_VOICE,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The nine production stages, in order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    IdeaGeneration,
    ScriptWriting,
    VoiceOver,
    PromptWriting,
    SeoOptimization,
    ThumbnailDesign,
    ThumbnailGeneration,
    ContentPlanning,
    FinalReview,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Stage::IdeaGeneration,
        Stage::ScriptWriting,
        Stage::VoiceOver,
        Stage::PromptWriting,
        Stage::SeoOptimization,
        Stage::ThumbnailDesign,
        Stage::ThumbnailGeneration,
        Stage::ContentPlanning,
        Stage::FinalReview,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn is_final(self) -> bool {
        self == Stage::FinalReview
    }

    /// Name of the agent persona that runs this stage
    pub fn agent_name(self) -> &'static str {
        match self {
            Stage::IdeaGeneration => "Sparky",
            Stage::ScriptWriting => "Scribe",
            Stage::VoiceOver => "Vox",
            Stage::PromptWriting => "Vision",
            Stage::SeoOptimization => "Ranker",
            Stage::ThumbnailDesign => "Pixel",
            Stage::ThumbnailGeneration => "Canvas",
            Stage::ContentPlanning => "Scheduler",
            Stage::FinalReview => "Launch",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::IdeaGeneration => "Idea Generation",
            Stage::ScriptWriting => "Script Writing",
            Stage::VoiceOver => "Voice Over",
            Stage::PromptWriting => "Prompt Writing",
            Stage::SeoOptimization => "SEO Optimization",
            Stage::ThumbnailDesign => "Thumbnail Design",
            Stage::ThumbnailGeneration => "Thumbnail Generation",
            Stage::ContentPlanning => "Content Planning",
            Stage::FinalReview => "Final Review",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.agent_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdeaStage {
    pub topic: String,
    pub result: Option<VideoIdea>,
    pub approved: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptStage {
    pub brief: ScriptBrief,
    pub script: String,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceStage {
    /// User-edited narration; `None` means narrate the script as written
    pub narration: Option<String>,
    pub voice: String,
    pub customization: VoiceCustomization,
    /// Raw 24 kHz mono PCM
    pub audio: Option<Vec<u8>>,
    pub approved: bool,
}

impl Default for VoiceStage {
    fn default() -> Self {
        Self {
            narration: None,
            voice: DEFAULT_VOICE.to_string(),
            customization: VoiceCustomization::default(),
            audio: None,
            approved: false,
        }
    }
}

impl VoiceStage {
    pub fn narration_text<'a>(&'a self, script: &'a str) -> &'a str {
        self.narration.as_deref().unwrap_or(script)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptStage {
    pub brief: PromptBrief,
    pub prompts: Vec<String>,
    pub approved: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeoStage {
    pub result: Option<SeoMetadata>,
    pub approved: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThumbnailDesignStage {
    pub concepts: Vec<ThumbnailConcept>,
    pub selected: Option<usize>,
    pub approved: bool,
}

impl ThumbnailDesignStage {
    pub fn selected_concept(&self) -> Option<&ThumbnailConcept> {
        self.selected.and_then(|i| self.concepts.get(i))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThumbnailImageStage {
    pub images: Vec<Vec<u8>>,
    pub approved: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanStage {
    pub slot: Option<PublishSlot>,
    pub schedule: Vec<String>,
    pub approved: bool,
}

/// Everything a session has produced so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    pub current: Stage,
    pub idea: IdeaStage,
    pub script: ScriptStage,
    pub voice: VoiceStage,
    pub prompts: PromptStage,
    pub seo: SeoStage,
    pub thumbnails: ThumbnailDesignStage,
    pub thumbnail_images: ThumbnailImageStage,
    pub plan: PlanStage,
}

/// A single change to the state: a user edit or a finished generation
#[derive(Debug, Clone, PartialEq)]
pub enum StageUpdate {
    Topic(String),
    Idea(VideoIdea),
    ScriptBrief(ScriptBrief),
    Script(String),
    Narration(String),
    Voice { voice: String, customization: VoiceCustomization },
    Audio(Vec<u8>),
    PromptBrief(PromptBrief),
    Prompts(Vec<String>),
    Seo(SeoMetadata),
    /// A fresh concept list; clears the selection
    Concepts(Vec<ThumbnailConcept>),
    SelectConcept(usize),
    ThumbnailImages(Vec<Vec<u8>>),
    PublishSlot(PublishSlot),
    Schedule(Vec<String>),
}

impl StageUpdate {
    /// Stage whose record this update writes to
    pub fn stage(&self) -> Stage {
        match self {
            StageUpdate::Topic(_) | StageUpdate::Idea(_) => Stage::IdeaGeneration,
            StageUpdate::ScriptBrief(_) | StageUpdate::Script(_) => Stage::ScriptWriting,
            StageUpdate::Narration(_) | StageUpdate::Voice { .. } | StageUpdate::Audio(_) => Stage::VoiceOver,
            StageUpdate::PromptBrief(_) | StageUpdate::Prompts(_) => Stage::PromptWriting,
            StageUpdate::Seo(_) => Stage::SeoOptimization,
            StageUpdate::Concepts(_) | StageUpdate::SelectConcept(_) => Stage::ThumbnailDesign,
            StageUpdate::ThumbnailImages(_) => Stage::ThumbnailGeneration,
            StageUpdate::PublishSlot(_) | StageUpdate::Schedule(_) => Stage::ContentPlanning,
        }
    }
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("{stage} cannot be approved yet: {reason}")]
    NotReady { stage: Stage, reason: &'static str },

    #[error("Cannot move from {from} to {to}: stages unlock one approval at a time")]
    NotReached { from: Stage, to: Stage },

    #[error("{0} is the last stage")]
    AtFinalStage(Stage),

    #[error("{0} has no generation step")]
    NoOperation(Stage),

    #[error("No thumbnail concept selected")]
    NoConceptSelected,

    #[error("Concept {index} does not exist ({available} concepts)")]
    ConceptOutOfRange { index: usize, available: usize },

    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl WorkflowState {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            idea: IdeaStage { topic: topic.into(), ..IdeaStage::default() },
            ..Self::default()
        }
    }

    pub fn is_approved(&self, stage: Stage) -> bool {
        match stage {
            Stage::IdeaGeneration => self.idea.approved,
            Stage::ScriptWriting => self.script.approved,
            Stage::VoiceOver => self.voice.approved,
            Stage::PromptWriting => self.prompts.approved,
            Stage::SeoOptimization => self.seo.approved,
            Stage::ThumbnailDesign => self.thumbnails.approved,
            Stage::ThumbnailGeneration => self.thumbnail_images.approved,
            Stage::ContentPlanning => self.plan.approved,
            Stage::FinalReview => false,
        }
    }

    /// Narration for the voice stage: the user's edit, or the script
    pub fn narration_text(&self) -> &str {
        self.voice.narration_text(&self.script.script)
    }

    /// Title used downstream of SEO: the optimized title, else the idea's
    pub fn working_title(&self) -> Option<&str> {
        self.seo
            .result
            .as_ref()
            .map(|s| s.title.as_str())
            .or_else(|| self.idea.result.as_ref().map(|i| i.title.as_str()))
            .filter(|t| !t.trim().is_empty())
    }

    /// Check an update against the current position without changing anything
    pub fn validate(&self, update: &StageUpdate) -> Result<(), WorkflowError> {
        let target = update.stage();
        if target > self.current {
            return Err(WorkflowError::NotReached { from: self.current, to: target });
        }
        if let StageUpdate::SelectConcept(index) = update {
            let available = self.thumbnails.concepts.len();
            if *index >= available {
                return Err(WorkflowError::ConceptOutOfRange { index: *index, available });
            }
        }
        Ok(())
    }

    /// Apply an edit or a generation result, returning the new state
    pub fn apply(self, update: StageUpdate) -> Result<Self, WorkflowError> {
        self.validate(&update)?;
        Ok(self.apply_validated(update))
    }

    pub(crate) fn apply_validated(mut self, update: StageUpdate) -> Self {
        match update {
            StageUpdate::Topic(topic) => self.idea.topic = topic,
            StageUpdate::Idea(idea) => self.idea.result = Some(idea),
            StageUpdate::ScriptBrief(brief) => self.script.brief = brief,
            StageUpdate::Script(script) => self.script.script = script,
            StageUpdate::Narration(text) => self.voice.narration = Some(text),
            StageUpdate::Voice { voice, customization } => {
                self.voice.voice = voice;
                self.voice.customization = customization;
            }
            StageUpdate::Audio(pcm) => self.voice.audio = Some(pcm),
            StageUpdate::PromptBrief(brief) => self.prompts.brief = brief,
            StageUpdate::Prompts(prompts) => self.prompts.prompts = prompts,
            StageUpdate::Seo(seo) => self.seo.result = Some(seo),
            StageUpdate::Concepts(concepts) => {
                self.thumbnails.concepts = concepts;
                self.thumbnails.selected = None;
            }
            StageUpdate::SelectConcept(index) => self.thumbnails.selected = Some(index),
            StageUpdate::ThumbnailImages(images) => self.thumbnail_images.images = images,
            StageUpdate::PublishSlot(slot) => self.plan.slot = Some(slot),
            StageUpdate::Schedule(schedule) => self.plan.schedule = schedule,
        }
        self
    }

    /// Check that the current stage may be approved
    pub fn check_approve(&self) -> Result<(), WorkflowError> {
        if self.current.is_final() {
            return Err(WorkflowError::AtFinalStage(self.current));
        }
        super::router::approval_blocker(self, self.current)
            .map_or(Ok(()), |reason| Err(WorkflowError::NotReady { stage: self.current, reason }))
    }

    /// Mark the current stage approved and move to the next one
    pub fn approve(self) -> Result<Self, WorkflowError> {
        self.check_approve()?;
        Ok(self.approve_validated())
    }

    pub(crate) fn approve_validated(mut self) -> Self {
        match self.current {
            Stage::IdeaGeneration => self.idea.approved = true,
            Stage::ScriptWriting => self.script.approved = true,
            Stage::VoiceOver => self.voice.approved = true,
            Stage::PromptWriting => self.prompts.approved = true,
            Stage::SeoOptimization => self.seo.approved = true,
            Stage::ThumbnailDesign => self.thumbnails.approved = true,
            Stage::ThumbnailGeneration => self.thumbnail_images.approved = true,
            Stage::ContentPlanning => self.plan.approved = true,
            Stage::FinalReview => {}
        }
        if let Some(next) = self.current.next() {
            self.current = next;
        }
        self
    }

    /// Revisit an earlier stage; data and approvals are kept
    pub fn go_to(self, stage: Stage) -> Result<Self, WorkflowError> {
        if stage > self.current {
            return Err(WorkflowError::NotReached { from: self.current, to: stage });
        }
        Ok(Self { current: stage, ..self })
    }
}
