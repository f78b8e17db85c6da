//! Named credential storage for the session guard.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use reqwest::header::{HeaderMap, SET_COOKIE};

use relais_core::{AccessToken, RefreshToken};

/// Cookie name carrying the access token.
pub const ACCESS_COOKIE: &str = "access_token";

/// Cookie name carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Cookie-like store holding the credential pair under well-known names.
///
/// The jar is owned exclusively by the session guard: collaborators may
/// read tokens (e.g. to decide whether a user is logged in) but only the
/// guard writes them.
#[derive(Default)]
pub struct TokenJar {
    entries: RwLock<HashMap<String, String>>,
}

impl TokenJar {
    /// Create an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value by name.
    pub fn get(&self, name: &str) -> Option<String> {
        self.entries.read().unwrap().get(name).cloned()
    }

    /// Store a value under a name, replacing any previous one.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .write()
            .unwrap()
            .insert(name.into(), value.into());
    }

    /// Remove a value by name. Removing an absent name is a no-op.
    pub fn remove(&self, name: &str) {
        self.entries.write().unwrap().remove(name);
    }

    /// Remove all stored values.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Typed view of the current access token.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.get(ACCESS_COOKIE).map(AccessToken::new)
    }

    /// Typed view of the current refresh token.
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.get(REFRESH_COOKIE).map(RefreshToken::new)
    }

    /// Ingest `Set-Cookie` headers from an authentication response.
    ///
    /// Only the credential cookies are kept; an empty value removes the
    /// stored token (the backend expires cookies that way).
    pub fn store_cookies(&self, headers: &HeaderMap) {
        for value in headers.get_all(SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let Some((name, value)) = parse_cookie_pair(raw) else {
                continue;
            };
            if name != ACCESS_COOKIE && name != REFRESH_COOKIE {
                continue;
            }
            if value.is_empty() {
                self.remove(name);
            } else {
                self.set(name, value);
            }
        }
    }
}

/// Extract the name/value pair from a `Set-Cookie` header, ignoring
/// attributes such as `Path`, `Max-Age` and `HttpOnly`.
fn parse_cookie_pair(raw: &str) -> Option<(&str, &str)> {
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    Some((name.trim(), value.trim()))
}

// Hide token values in Debug output
impl fmt::Debug for TokenJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read().unwrap();
        f.debug_struct("TokenJar")
            .field("names", &entries.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(SET_COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    #[test]
    fn stores_credential_cookies_and_ignores_attributes() {
        let jar = TokenJar::new();
        jar.store_cookies(&headers(&[
            "access_token=abc123; HttpOnly; Path=/; Max-Age=3600; SameSite=Lax",
            "refresh_token=def456; HttpOnly; Path=/",
        ]));

        assert_eq!(jar.get(ACCESS_COOKIE).as_deref(), Some("abc123"));
        assert_eq!(jar.get(REFRESH_COOKIE).as_deref(), Some("def456"));
    }

    #[test]
    fn ignores_unrelated_cookies() {
        let jar = TokenJar::new();
        jar.store_cookies(&headers(&["theme=dark; Path=/", "csrftoken=zzz"]));
        assert!(jar.get("theme").is_none());
        assert!(jar.get("csrftoken").is_none());
    }

    #[test]
    fn empty_value_removes_token() {
        let jar = TokenJar::new();
        jar.set(ACCESS_COOKIE, "abc123");
        jar.store_cookies(&headers(&["access_token=; Max-Age=0"]));
        assert!(jar.get(ACCESS_COOKIE).is_none());
    }

    #[test]
    fn debug_redacts_values() {
        let jar = TokenJar::new();
        jar.set(ACCESS_COOKIE, "very-secret");
        let debug = format!("{:?}", jar);
        assert!(!debug.contains("very-secret"));
    }
}
