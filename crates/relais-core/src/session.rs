//! Session state owned by the session guard.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Authenticated session state.
///
/// The state is owned by the session guard and mutated only through its
/// operations (login, logout, check, refresh, update); collaborators read
/// snapshots to decide "is a user logged in" and render errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current identity, when authenticated.
    pub user: Option<User>,
    /// Whether a session is established.
    pub is_authenticated: bool,
    /// Whether an authentication operation is in progress.
    pub loading: bool,
    /// Last user-visible error message.
    pub error: Option<String>,
}

/// The durable subset of session state, restored on startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

/// Serialization boundary: map full session state to its persisted subset.
///
/// The loading flag and the last error are transient and never written to
/// durable storage.
pub fn persisted_view(state: &SessionState) -> PersistedSession {
    PersistedSession {
        user: state.user.clone(),
        is_authenticated: state.is_authenticated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_view_drops_transient_fields() {
        let state = SessionState {
            user: Some(User {
                id: "u1".to_string(),
                username: "jdoe".to_string(),
                mail: "j@example.com".to_string(),
                nom: "Doe".to_string(),
                prenom: "John".to_string(),
                genre: String::new(),
            }),
            is_authenticated: true,
            loading: true,
            error: Some("stale".to_string()),
        };

        let snapshot = persisted_view(&state);
        assert!(snapshot.is_authenticated);
        assert_eq!(snapshot.user.unwrap().username, "jdoe");

        let json = serde_json::to_value(persisted_view(&state)).unwrap();
        assert!(json.get("loading").is_none());
        assert!(json.get("error").is_none());
    }
}
