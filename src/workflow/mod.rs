// Workflow orchestration - nine approval-gated stages driven by one session
pub mod executor;
pub mod router;
pub mod state;

pub use executor::WorkflowSession;
pub use router::{can_approve, can_enter, operation_for, should_auto_generate, StageOperation};
pub use state::{Stage, StageUpdate, WorkflowError, WorkflowState};
