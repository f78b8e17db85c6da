//! REST endpoint paths and wire types for the relais backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use relais_core::User;

/// Password login. Tokens are delivered via `Set-Cookie` headers.
pub(crate) const AUTH_FROM_PASSWORD: &str = "/auth/auth_from_password";

/// Account registration. Issues no credentials; follow with a login.
pub(crate) const REGISTER: &str = "/auth/register";

/// Session teardown.
pub(crate) const LOGOUT: &str = "/auth/logout";

/// Credential renewal from the refresh token.
pub(crate) const REFRESH_TOKEN: &str = "/auth/refresh_token";

/// Current identity.
pub(crate) const ME: &str = "/auth/me";

/// Partial profile update.
pub(crate) const UPDATE_PROFILE: &str = "/users/update_profile";

/// Request body for auth_from_password.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub mail: &'a str,
    pub password: &'a str,
}

/// Response from auth_from_password.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub mail: String,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
}

impl LoginResponse {
    /// Convert into the identity type. The login response omits `genre`;
    /// a later identity query fills it in.
    pub(crate) fn into_user(self) -> User {
        User {
            id: self.user_id,
            username: self.username,
            mail: self.mail,
            nom: self.nom,
            prenom: self.prenom,
            genre: String::new(),
        }
    }
}

/// Response from register.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterResponse {
    #[allow(dead_code)]
    pub message: String,
    #[allow(dead_code)]
    pub user_id: String,
}

/// Request body for refresh_token.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response from refresh_token. The refresh token is echoed back
/// unchanged; only the access token rotates.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub expiration_access_token: Option<DateTime<Utc>>,
    #[serde(default)]
    #[allow(dead_code)]
    pub expiration_refresh_token: Option<DateTime<Utc>>,
}

/// Confirmation-only response.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[allow(dead_code)]
    pub message: String,
}

/// Response from update_profile.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateProfileResponse {
    #[allow(dead_code)]
    pub message: String,
    pub user: User,
}
