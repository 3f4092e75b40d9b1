//! GetPromptHandler - re-renders the current step's prompt.
//!
//! Supports resumption: a client that lost its view asks for the prompt of
//! wherever the session currently is.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::workflow::{NextStep, WorkflowDefinition};
use crate::ports::SessionStore;

use super::InterviewError;

/// The session's current position.
#[derive(Debug, Clone)]
pub struct CurrentPrompt {
    pub session_id: SessionId,
    pub step_seq: u64,
    pub next: NextStep,
}

/// Handler for rendering the current prompt.
pub struct GetPromptHandler {
    workflow: Arc<WorkflowDefinition>,
    store: Arc<dyn SessionStore>,
}

impl GetPromptHandler {
    pub fn new(workflow: Arc<WorkflowDefinition>, store: Arc<dyn SessionStore>) -> Self {
        Self { workflow, store }
    }

    pub async fn handle(&self, session_id: SessionId) -> Result<CurrentPrompt, InterviewError> {
        let session = self.store.load(session_id).await?;
        let next = if self.workflow.is_terminal(session.current_step()) {
            NextStep::Complete
        } else {
            NextStep::Prompt(self.workflow.prompt_for(&session)?)
        };
        Ok(CurrentPrompt {
            session_id,
            step_seq: session.step_seq(),
            next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySessionStore;
    use crate::domain::foundation::StepName;
    use crate::domain::session::Session;
    use crate::domain::workflow::flow;

    #[tokio::test]
    async fn renders_prompt_for_stored_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let workflow = flow::workflow();
        let mut session = Session::new(SessionId::new(), workflow.entry().clone());
        session.advance_to(StepName::from(flow::steps::PROPERTY_KIND));
        store.save(&session).await.unwrap();

        let handler = GetPromptHandler::new(workflow, store);
        let current = handler.handle(session.id()).await.unwrap();
        assert_eq!(current.step_seq, 1);
        assert!(matches!(
            current.next,
            NextStep::Prompt(ref p) if p.step == flow::steps::PROPERTY_KIND
        ));
    }

    #[tokio::test]
    async fn terminal_session_reports_completion() {
        let store = Arc::new(InMemorySessionStore::new());
        let workflow = flow::workflow();
        let mut session = Session::new(SessionId::new(), workflow.entry().clone());
        session.advance_to(StepName::from(flow::steps::COMPLETE));
        store.save(&session).await.unwrap();

        let handler = GetPromptHandler::new(workflow, store);
        let current = handler.handle(session.id()).await.unwrap();
        assert_eq!(current.next, NextStep::Complete);
    }

    #[tokio::test]
    async fn missing_session_is_reported() {
        let store = Arc::new(InMemorySessionStore::new());
        let handler = GetPromptHandler::new(flow::workflow(), store);
        let err = handler.handle(SessionId::new()).await.unwrap_err();
        assert!(matches!(err, InterviewError::SessionNotFound(_)));
    }
}
