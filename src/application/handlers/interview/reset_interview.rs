//! ResetInterviewHandler - discards a session and issues a fresh one.
//!
//! The replacement keeps the same id with a bumped generation stamp.
//! Deliberately does not queue behind the per-session lock: a reset must
//! win against an in-flight upload, whose late extraction result the
//! bumped stamp then invalidates.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::domain::workflow::WorkflowDefinition;
use crate::ports::{SessionStore, StoreError};

use super::{InterviewError, StartInterviewResult};

/// Handler for resetting interviews.
pub struct ResetInterviewHandler {
    workflow: Arc<WorkflowDefinition>,
    store: Arc<dyn SessionStore>,
}

impl ResetInterviewHandler {
    pub fn new(workflow: Arc<WorkflowDefinition>, store: Arc<dyn SessionStore>) -> Self {
        Self { workflow, store }
    }

    pub async fn handle(&self, session_id: SessionId) -> Result<StartInterviewResult, InterviewError> {
        let generation = match self.store.load(session_id).await {
            Ok(session) => session.generation(),
            Err(StoreError::NotFound(_)) => 0,
            Err(other) => return Err(other.into()),
        };

        self.store.delete(session_id).await?;
        let session =
            Session::with_generation(session_id, self.workflow.entry().clone(), generation + 1);
        let prompt = self.workflow.prompt_for(&session)?;
        self.store.save(&session).await?;

        info!(session = %session_id, generation = session.generation(), "interview reset");
        Ok(StartInterviewResult {
            session_id,
            step_seq: session.step_seq(),
            prompt,
        })
    }
}
