//! StartInterviewHandler - creates a session at the entry step.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::domain::workflow::{StepPrompt, WorkflowDefinition};
use crate::ports::SessionStore;

use super::InterviewError;

/// Result of starting (or resetting) an interview.
#[derive(Debug, Clone)]
pub struct StartInterviewResult {
    pub session_id: SessionId,
    pub step_seq: u64,
    /// The first prompt to show.
    pub prompt: StepPrompt,
}

/// Handler for starting interviews.
pub struct StartInterviewHandler {
    workflow: Arc<WorkflowDefinition>,
    store: Arc<dyn SessionStore>,
}

impl StartInterviewHandler {
    pub fn new(workflow: Arc<WorkflowDefinition>, store: Arc<dyn SessionStore>) -> Self {
        Self { workflow, store }
    }

    pub async fn handle(&self) -> Result<StartInterviewResult, InterviewError> {
        let session = Session::new(SessionId::new(), self.workflow.entry().clone());
        let prompt = self.workflow.prompt_for(&session)?;
        self.store.save(&session).await?;

        info!(session = %session.id(), "interview started");
        Ok(StartInterviewResult {
            session_id: session.id(),
            step_seq: session.step_seq(),
            prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStore;
    use crate::domain::workflow::flow;

    #[tokio::test]
    async fn starts_at_the_entry_step_and_persists() {
        let store = Arc::new(InMemorySessionStore::new());
        let handler = StartInterviewHandler::new(flow::workflow(), store.clone());

        let result = handler.handle().await.unwrap();
        assert_eq!(result.step_seq, 0);
        assert_eq!(result.prompt.step, flow::steps::ENTRY);
        assert!(!result.prompt.options.is_empty());

        let stored = store.load(result.session_id).await.unwrap();
        assert_eq!(stored.current_step(), &flow::steps::ENTRY);
    }

    #[tokio::test]
    async fn each_start_creates_a_distinct_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let handler = StartInterviewHandler::new(flow::workflow(), store.clone());
        let a = handler.handle().await.unwrap();
        let b = handler.handle().await.unwrap();
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(store.len().await, 2);
    }
}
