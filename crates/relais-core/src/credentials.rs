//! Login credentials.

use std::fmt;

/// Credentials for password authentication.
///
/// # Security
///
/// The password is never logged or displayed in Debug output.
#[derive(Clone)]
pub struct Credentials {
    mail: String,
    password: String,
}

impl Credentials {
    /// Create new credentials from an email address and password.
    pub fn new(mail: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mail: mail.into(),
            password: password.into(),
        }
    }

    /// Returns the email address.
    pub fn mail(&self) -> &str {
        &self.mail
    }

    /// Returns the password for use in the login request.
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Hide password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("mail", &self.mail)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hidden_in_debug() {
        let credentials = Credentials::new("alice@example.com", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("alice@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
