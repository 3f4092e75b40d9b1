//! Workflow-specific error types.

use thiserror::Error;

use crate::domain::foundation::{StepName, ValidationError};
use crate::domain::session::EntityError;

/// The workflow definition itself is inconsistent.
///
/// Raised at build time, before any session can be processed. Fatal: a
/// process holding an unbuildable definition must refuse to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no steps were registered")]
    NoSteps,

    #[error("no entry step was designated")]
    NoEntryStep,

    #[error("no terminal step was designated")]
    NoTerminalStep,

    #[error("step '{0}' is registered twice")]
    DuplicateStep(StepName),

    #[error("entry step '{0}' is not registered")]
    MissingEntryStep(StepName),

    #[error("terminal step '{0}' must not carry a handler registration")]
    TerminalIsRegistered(StepName),

    #[error("step '{step}' routes to '{target}', which does not exist")]
    DanglingTarget { step: StepName, target: StepName },

    #[error(
        "step '{step}' offers options {offered:?} but its conditions route {routed:?}"
    )]
    VocabularyMismatch {
        step: StepName,
        offered: Vec<String>,
        routed: Vec<String>,
    },

    #[error("step '{0}' routes conditionally on an open-ended response")]
    ConditionalOnOpenResponse(StepName),

    #[error("step '{0}' is unreachable from the entry step")]
    UnreachableStep(StepName),
}

/// A response passed validation but matched no outgoing condition.
///
/// Unreachable when the build-time vocabulary check holds; surfaced as a
/// distinguishable failure rather than leaving the session silently stuck.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no transition matched response '{response}' at step '{step}'")]
pub struct TransitionError {
    pub step: StepName,
    pub response: String,
}

/// Everything that can go wrong while applying one step to one session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error("step '{0}' is not part of the workflow definition")]
    UnknownStep(StepName),

    #[error("extracted fields are required to accept a file-upload step")]
    MissingExtraction,

    #[error("the interview is already complete")]
    AlreadyComplete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_names_step_and_response() {
        let err = TransitionError {
            step: StepName::from("buyer-kind"),
            response: "trust".into(),
        };
        assert_eq!(
            err.to_string(),
            "no transition matched response 'trust' at step 'buyer-kind'"
        );
    }

    #[test]
    fn engine_error_wraps_validation_transparently() {
        let err = EngineError::from(ValidationError::EmptyText);
        assert_eq!(err.to_string(), "text response cannot be empty");
    }
}
