//! Session store port.
//!
//! Keyed persistence of session state across requests. The engine depends
//! only on this contract, not on a specific storage technology.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;

/// Repository port for interview sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no session exists under the id
    async fn load(&self, id: SessionId) -> Result<Session, StoreError>;

    /// Persists a session, replacing any previous state under its id.
    async fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Removes a session. Removing an absent session is not an error.
    async fn delete(&self, id: SessionId) -> Result<(), StoreError>;
}

/// Session store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("session could not be serialized: {0}")]
    Serialization(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }

    #[test]
    fn not_found_is_distinguishable() {
        let id = SessionId::new();
        assert!(StoreError::NotFound(id).is_not_found());
        assert!(!StoreError::Backend("boom".into()).is_not_found());
    }
}
