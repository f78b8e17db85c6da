//! Durable session persistence.

use async_trait::async_trait;

use crate::Result;
use crate::session::PersistedSession;

/// Durable key/value persistence for the session snapshot.
///
/// The session guard writes the persisted subset of its state through this
/// trait under a fixed namespace and restores it on startup. Implementations
/// must be safe to share across tasks; the guard never issues overlapping
/// writes for the same snapshot.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist the session snapshot, replacing any previous one.
    async fn save(&self, snapshot: &PersistedSession) -> Result<()>;

    /// Load the previously persisted snapshot, if any.
    async fn load(&self) -> Result<Option<PersistedSession>>;

    /// Remove the persisted snapshot.
    async fn clear(&self) -> Result<()>;
}
