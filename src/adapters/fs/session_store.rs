//! JSON-file session store.
//!
//! One file per session under a data directory. Suitable for local runs
//! and tests; anything heavier belongs behind its own adapter.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionStore, StoreError};

#[derive(Debug, Clone)]
pub struct JsonFileSessionStore {
    dir: PathBuf,
}

impl JsonFileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: SessionId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    async fn ensure_dir(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn load(&self, id: SessionId) -> Result<Session, StoreError> {
        let path = self.path_for(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id))
            }
            Err(e) => return Err(StoreError::Backend(e.to_string())),
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.ensure_dir().await?;
        let bytes = serde_json::to_vec_pretty(session)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        tokio::fs::write(self.path_for(session.id()), bytes)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn delete(&self, id: SessionId) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }
}
