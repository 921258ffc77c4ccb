// lib.rs - TubeFlow content-production orchestration
pub mod audio;
pub mod backend;
pub mod config;
pub mod error;
pub mod export;
pub mod gemini_client;
pub mod generation;
pub mod orchestration;
pub mod types;
pub mod utils;
pub mod workflow;

// Re-export commonly used types for convenience
pub use backend::{GenerateRequest, GenerateResponse, GenerationBackend, ImagenRequest};
pub use config::{ModelConfig, RetryConfig, StudioConfig};
pub use error::GenerationError;
pub use export::ContentPackage;
pub use gemini_client::GeminiClient;
pub use generation::ContentStudio;
pub use types::*;
pub use workflow::{Stage, StageUpdate, WorkflowError, WorkflowSession, WorkflowState};
