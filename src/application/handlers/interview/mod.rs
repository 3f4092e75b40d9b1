//! Interview operations.
//!
//! - `start_interview` - create a session at the entry step
//! - `get_prompt` - re-render the current step (resumption)
//! - `process_step` - apply one response, drive one transition
//! - `reset_interview` - discard and reissue a session
//! - `transition_map` - introspection over the built graph

mod error;
mod get_prompt;
mod process_step;
mod reset_interview;
mod start_interview;
mod transition_map;

pub use crate::application::session_locks::SessionLockRegistry;
pub use error::InterviewError;
pub use get_prompt::{CurrentPrompt, GetPromptHandler};
pub use process_step::{ProcessStepCommand, ProcessStepHandler, ProcessStepResult, RetryPolicy};
pub use reset_interview::ResetInterviewHandler;
pub use start_interview::{StartInterviewHandler, StartInterviewResult};
pub use transition_map::GetTransitionMapHandler;
