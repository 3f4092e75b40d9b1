//! In-memory session store.
//!
//! Backs tests and single-process deployments. State lives in a map behind
//! an async read-write lock; sessions are cloned in and out.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, for tests and diagnostics.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: SessionId) -> Result<Session, StoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.id(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<(), StoreError> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::StepName;

    fn session() -> Session {
        Session::new(SessionId::new(), StepName::from("buyer-kind"))
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.save(&s).await.unwrap();
        let loaded = store.load(s.id()).await.unwrap();
        assert_eq!(loaded, s);
    }

    #[tokio::test]
    async fn load_missing_session_is_not_found() {
        let store = InMemorySessionStore::new();
        let err = store.load(SessionId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn save_replaces_previous_state() {
        let store = InMemorySessionStore::new();
        let mut s = session();
        store.save(&s).await.unwrap();
        s.advance_to(StepName::from("seller-kind"));
        store.save(&s).await.unwrap();

        let loaded = store.load(s.id()).await.unwrap();
        assert_eq!(loaded.step_seq(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.save(&s).await.unwrap();
        store.delete(s.id()).await.unwrap();
        store.delete(s.id()).await.unwrap();
        assert!(store.is_empty().await);
    }
}
