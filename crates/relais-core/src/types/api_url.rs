//! API base URL type.

use std::fmt;
use std::str::FromStr;
use url::{Host, Url};

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the relais backend.
///
/// HTTPS is required for remote hosts; plain HTTP is accepted for loopback
/// addresses so local development servers and test fixtures work.
///
/// # Example
///
/// ```
/// use relais_core::ApiUrl;
///
/// let api = ApiUrl::new("https://api.relais.example").unwrap();
/// assert_eq!(api.endpoint_url("/auth/me"),
///            "https://api.relais.example/auth/me");
///
/// let local = ApiUrl::new("http://localhost:8000").unwrap();
/// assert_eq!(local.endpoint_url("/auth/me"), "http://localhost:8000/auth/me");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the full URL for an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        // The URL crate always adds a trailing slash to root paths,
        // so trim it before appending the endpoint path
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}{}", base, path)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| {
            Error::InvalidInput(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: reason.to_string(),
            })
        };

        match url.scheme() {
            "https" => {}
            "http" => {
                let loopback = match url.host() {
                    Some(Host::Domain(domain)) => domain == "localhost",
                    Some(Host::Ipv4(ip)) => ip.is_loopback(),
                    Some(Host::Ipv6(ip)) => ip.is_loopback(),
                    None => return Err(invalid("missing host")),
                };
                if !loopback {
                    return Err(invalid("http is only allowed for loopback hosts"));
                }
            }
            other => return Err(invalid(&format!("unsupported scheme '{}'", other))),
        }

        if url.host_str().is_none() {
            return Err(invalid("missing host"));
        }

        Ok(())
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https() {
        let api = ApiUrl::new("https://api.relais.example").unwrap();
        assert_eq!(api.host(), Some("api.relais.example"));
    }

    #[test]
    fn accepts_http_loopback() {
        assert!(ApiUrl::new("http://localhost:8000").is_ok());
        assert!(ApiUrl::new("http://127.0.0.1:9999").is_ok());
    }

    #[test]
    fn rejects_http_remote() {
        assert!(ApiUrl::new("http://api.relais.example").is_err());
    }

    #[test]
    fn rejects_http_domain_that_looks_like_loopback() {
        assert!(ApiUrl::new("http://127.evil.com").is_err());
        assert!(ApiUrl::new("http://localhost.evil.com").is_err());
    }

    #[test]
    fn rejects_unknown_scheme() {
        assert!(ApiUrl::new("ftp://api.relais.example").is_err());
        assert!(ApiUrl::new("not a url").is_err());
    }

    #[test]
    fn endpoint_url_joins_path() {
        let api = ApiUrl::new("https://api.relais.example/").unwrap();
        assert_eq!(
            api.endpoint_url("/auth/refresh_token"),
            "https://api.relais.example/auth/refresh_token"
        );
    }
}
