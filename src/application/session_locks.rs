//! Per-session serialization boundary.
//!
//! Entity mutation is not commutative, so each session is processed by at
//! most one in-flight `process_step` call at a time. Concurrent calls for
//! the same session queue behind the lock; calls for different sessions do
//! not contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

#[derive(Debug, Default)]
pub struct SessionLockRegistry {
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one session, waiting behind any in-flight call.
    pub async fn acquire(&self, id: SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.locks.lock().await;
            map.entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drops the lock entry for a session that no longer exists.
    pub async fn remove(&self, id: SessionId) {
        self.locks.lock().await.remove(&id);
    }
}
