//! ProcessStepHandler - applies one response to one session.
//!
//! The outward-facing operation of the engine. Serializes per session,
//! rejects stale step sequences, drives the extraction gateway for
//! file-upload steps with bounded retries, and commits the advanced
//! session through the store.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::domain::foundation::{RawFieldMap, SessionId, StaleRequestError, ValidationError};
use crate::domain::sanitize;
use crate::domain::session::Session;
use crate::domain::workflow::{
    apply_step, DocumentHint, EngineError, NextStep, ResponsePayload, WorkflowDefinition,
};
use crate::ports::{ExtractionGateway, SessionStore};

use super::{InterviewError, SessionLockRegistry};

/// Bounded retry with increasing backoff for the extraction call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, the first call included.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Growth factor applied per subsequent attempt.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after the given 1-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt.saturating_sub(1) as i32);
        self.base_delay.mul_f64(factor)
    }
}

/// Command carrying one response for a session.
#[derive(Debug, Clone)]
pub struct ProcessStepCommand {
    pub session_id: SessionId,
    /// The step-sequence number the client believes the session is at.
    /// Anything other than the session's current value is rejected.
    pub step_seq: u64,
    pub response: ResponsePayload,
}

/// Result of a successfully applied step.
#[derive(Debug, Clone)]
pub struct ProcessStepResult {
    pub session_id: SessionId,
    /// The session's step-sequence counter after the transition.
    pub step_seq: u64,
    pub next: NextStep,
}

/// Handler for processing interview steps.
pub struct ProcessStepHandler {
    workflow: Arc<WorkflowDefinition>,
    store: Arc<dyn SessionStore>,
    gateway: Arc<dyn ExtractionGateway>,
    locks: Arc<SessionLockRegistry>,
    retry: RetryPolicy,
}

impl ProcessStepHandler {
    pub fn new(
        workflow: Arc<WorkflowDefinition>,
        store: Arc<dyn SessionStore>,
        gateway: Arc<dyn ExtractionGateway>,
        locks: Arc<SessionLockRegistry>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            workflow,
            store,
            gateway,
            locks,
            retry,
        }
    }

    #[instrument(skip(self, cmd), fields(session = %cmd.session_id, seq = cmd.step_seq))]
    pub async fn handle(&self, cmd: ProcessStepCommand) -> Result<ProcessStepResult, InterviewError> {
        // Serialize against other process_step calls for this session.
        // Reset does not take this lock; the generation stamp below covers it.
        let _guard = self.locks.acquire(cmd.session_id).await;

        let session = self.load(cmd.session_id).await?;
        if cmd.step_seq != session.step_seq() {
            return Err(StaleRequestError {
                current: session.step_seq(),
                requested: cmd.step_seq,
            }
            .into());
        }

        let step = self
            .workflow
            .step(session.current_step())
            .ok_or_else(|| EngineError::UnknownStep(session.current_step().clone()))?;

        // Validate before any suspension so bad input never reaches the
        // gateway.
        step.handler
            .validate(&session, &cmd.response)
            .map_err(EngineError::from)?;

        let extracted = match (step.handler.document_hint(), &cmd.response) {
            (Some(hint), ResponsePayload::File { bytes, filename }) => {
                let raw = self.extract_with_retry(bytes, filename, hint).await?;
                let fields = sanitize::sanitize(raw);

                // The gateway call suspended; anything may have happened to
                // the session in the meantime. A reset bumps the generation
                // stamp, which makes this result stale.
                let fresh = self.load(cmd.session_id).await?;
                if fresh.generation() != session.generation()
                    || fresh.step_seq() != session.step_seq()
                {
                    debug!("discarding extraction result for a superseded session state");
                    return Err(StaleRequestError {
                        current: fresh.step_seq(),
                        requested: cmd.step_seq,
                    }
                    .into());
                }
                Some(fields)
            }
            (Some(_), _) => {
                return Err(EngineError::from(ValidationError::WrongResponseKind {
                    expected: "file",
                })
                .into())
            }
            (None, _) => None,
        };

        let outcome = apply_step(&self.workflow, &session, &cmd.response, extracted)?;
        self.store.save(&outcome.session).await?;

        Ok(ProcessStepResult {
            session_id: cmd.session_id,
            step_seq: outcome.session.step_seq(),
            next: outcome.next,
        })
    }

    async fn load(&self, id: SessionId) -> Result<Session, InterviewError> {
        Ok(self.store.load(id).await?)
    }

    async fn extract_with_retry(
        &self,
        bytes: &[u8],
        filename: &str,
        hint: DocumentHint,
    ) -> Result<RawFieldMap, InterviewError> {
        let mut attempt = 1u32;
        loop {
            match self.gateway.extract(bytes, filename, hint).await {
                Ok(raw) => return Ok(raw),
                Err(error) if error.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(%error, attempt, delay_ms = delay.as_millis() as u64, "extraction failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    return Err(InterviewError::Extraction {
                        error,
                        attempts: attempt,
                    })
                }
            }
        }
    }
}
