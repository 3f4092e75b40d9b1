//! Single-step application: the heart of the state machine.
//!
//! `apply_step` is pure with respect to its inputs: it validates the
//! response, applies the handler's effect to a working copy of the session,
//! resolves exactly one transition, and returns the advanced session. On
//! any failure the working copy is discarded, so the caller's session is
//! never left half-mutated.

use tracing::debug;

use crate::domain::foundation::FieldMap;
use crate::domain::session::{HistoryEntry, Session};

use super::{EngineError, ResponsePayload, StepPrompt, WorkflowDefinition};

/// What the caller should show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    Prompt(StepPrompt),
    /// The transition landed on the terminal step; the interview is over.
    Complete,
}

/// Result of applying one response to one session.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// The advanced session. Replaces the caller's copy on success.
    pub session: Session,
    pub next: NextStep,
}

/// Applies one response to one session and drives exactly one transition.
///
/// For file-upload steps `extracted` must carry the sanitized fields from
/// the extraction gateway; the suspension itself happens in the caller so
/// that retry policy stays configurable per deployment.
///
/// # Errors
///
/// - `AlreadyComplete` if the session sits on the terminal step
/// - `UnknownStep` if the current step is not in the definition
/// - `Validation` without touching the session
/// - `Transition` if no condition matched (a graph defect; the build-time
///   vocabulary check makes this unreachable for well-formed definitions)
/// - `Entity` if the effect would violate an entity invariant
pub fn apply_step(
    definition: &WorkflowDefinition,
    session: &Session,
    response: &ResponsePayload,
    extracted: Option<FieldMap>,
) -> Result<StepOutcome, EngineError> {
    if definition.is_terminal(session.current_step()) {
        return Err(EngineError::AlreadyComplete);
    }
    let step = definition
        .step(session.current_step())
        .ok_or_else(|| EngineError::UnknownStep(session.current_step().clone()))?;

    step.handler.validate(session, response)?;

    let mut work = session.clone();
    step.handler.accept(&mut work, response, extracted)?;

    let target = step
        .transition
        .next(&step.name, response.literal())?
        .clone();

    work.push_history(HistoryEntry::new(step.name.clone(), response.summary()));
    work.advance_to(target.clone());

    debug!(
        session = %work.id(),
        from = %step.name,
        to = %target,
        seq = work.step_seq(),
        "applied transition"
    );

    let next = if definition.is_terminal(&target) {
        NextStep::Complete
    } else {
        NextStep::Prompt(definition.prompt_for(&work)?)
    };

    Ok(StepOutcome { session: work, next })
}
