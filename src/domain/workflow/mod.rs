//! The step/transition engine.
//!
//! - `handler` - the four step handler kinds and their shared contract
//! - `transition` - conditions and transition rules
//! - `definition` - the step registry, build-time checks, introspection
//! - `engine` - single-step application
//! - `flow` - the concrete deed interview graph
//! - `vocab` - the response vocabulary, defined once

mod definition;
mod engine;
mod errors;
mod handler;
mod transition;

pub mod flow;
pub mod vocab;

pub use definition::{StepDefinition, WorkflowBuilder, WorkflowDefinition};
pub use engine::{apply_step, NextStep, StepOutcome};
pub use errors::{ConfigurationError, EngineError, TransitionError};
pub use handler::{
    AcceptEffect, DocumentHint, DynamicPrompt, MergeTarget, OwnerScope, ResponsePayload,
    StepHandler, StepPrompt, TextRule,
};
pub use transition::{Condition, TransitionRule};
