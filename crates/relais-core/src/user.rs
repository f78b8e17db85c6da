//! Identity types exchanged with the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A platform user as returned by the identity endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub mail: String,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[serde(default)]
    pub genre: String,
}

/// Registration form submitted to `POST /auth/register`.
///
/// All fields are required by the backend.
#[derive(Clone, Serialize)]
pub struct RegisterForm {
    pub nom: String,
    pub prenom: String,
    pub mail: String,
    pub password: String,
    pub username: String,
    pub genre: String,
}

// Hide password in Debug output
impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("nom", &self.nom)
            .field("prenom", &self.prenom)
            .field("mail", &self.mail)
            .field("password", &"[REDACTED]")
            .field("username", &self.username)
            .field("genre", &self.genre)
            .finish()
    }
}

/// Partial identity update for `PUT /users/update_profile`.
///
/// Only the fields set to `Some` are sent; the backend rejects an update
/// with no fields at all.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl ProfileUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.nom.is_none()
            && self.prenom.is_none()
            && self.username.is_none()
            && self.mail.is_none()
            && self.genre.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_tolerates_missing_optional_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "username": "jdoe",
            "mail": "j@example.com"
        }))
        .unwrap();
        assert_eq!(user.username, "jdoe");
        assert!(user.genre.is_empty());
    }

    #[test]
    fn profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            nom: Some("Doe".to_string()),
            ..ProfileUpdate::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, json!({"nom": "Doe"}));
    }

    #[test]
    fn register_form_hides_password_in_debug() {
        let form = RegisterForm {
            nom: "Doe".to_string(),
            prenom: "John".to_string(),
            mail: "j@example.com".to_string(),
            password: "hunter2".to_string(),
            username: "jdoe".to_string(),
            genre: "homme".to_string(),
        };
        let debug = format!("{:?}", form);
        assert!(!debug.contains("hunter2"));
    }
}
