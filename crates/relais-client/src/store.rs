//! Session snapshot stores.

use std::sync::RwLock;

use async_trait::async_trait;

use relais_core::{PersistedSession, Result, SessionStore};

/// In-memory session store.
///
/// The default when no durable store is injected into the guard; useful in
/// tests and for short-lived processes that do not restore sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Option<PersistedSession>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a snapshot.
    pub fn with_snapshot(snapshot: PersistedSession) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn save(&self, snapshot: &PersistedSession) -> Result<()> {
        *self.snapshot.write().unwrap() = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<PersistedSession>> {
        Ok(self.snapshot.read().unwrap().clone())
    }

    async fn clear(&self) -> Result<()> {
        self.snapshot.write().unwrap().take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_load_clear() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());

        let snapshot = PersistedSession {
            user: None,
            is_authenticated: true,
        };
        store.save(&snapshot).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(snapshot));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
