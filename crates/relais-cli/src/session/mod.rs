//! Session persistence for the CLI.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use relais_client::{MemoryStore, SessionGuard};
use relais_core::{ApiUrl, PersistedSession, persisted_view};

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredSession {
    pub base_url: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub snapshot: Option<PersistedSession>,
}

impl StoredSession {
    /// Capture the guard's current credentials and session snapshot.
    pub fn capture(guard: &SessionGuard) -> Self {
        Self {
            base_url: guard.base().to_string(),
            access_token: guard.access_token().map(|t| t.into_inner()),
            refresh_token: guard.refresh_token().map(|t| t.into_inner()),
            snapshot: Some(persisted_view(&guard.session())),
        }
    }

    /// Rebuild a guard from the stored session.
    pub fn into_guard(self) -> Result<SessionGuard> {
        let base = ApiUrl::new(&self.base_url).context("Invalid base URL in session file")?;

        let mut builder = SessionGuard::builder(base);
        if let Some(token) = self.access_token {
            builder = builder.access_token(token);
        }
        if let Some(token) = self.refresh_token {
            builder = builder.refresh_token(token);
        }
        if let Some(snapshot) = self.snapshot {
            builder = builder.store(Arc::new(MemoryStore::with_snapshot(snapshot)));
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stored_session_round_trips_through_a_guard() {
        let stored = StoredSession {
            base_url: "http://localhost:8000".to_string(),
            access_token: Some("access-1".to_string()),
            refresh_token: Some("refresh-1".to_string()),
            snapshot: Some(PersistedSession {
                user: None,
                is_authenticated: true,
            }),
        };

        let json = serde_json::to_string(&stored).unwrap();
        let parsed: StoredSession = serde_json::from_str(&json).unwrap();
        let guard = parsed.into_guard().unwrap();
        guard.restore().await.unwrap();

        assert_eq!(guard.access_token().unwrap().as_str(), "access-1");
        assert_eq!(guard.refresh_token().unwrap().as_str(), "refresh-1");
        assert!(guard.is_authenticated());

        let recaptured = StoredSession::capture(&guard);
        assert_eq!(recaptured.base_url, guard.base().to_string());
        assert_eq!(recaptured.access_token.as_deref(), Some("access-1"));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let stored = StoredSession {
            base_url: "not a url".to_string(),
            access_token: None,
            refresh_token: None,
            snapshot: None,
        };
        assert!(stored.into_guard().is_err());
    }
}
