//! Authentication passthrough for the GitHub API.
//!
//! The bridge holds no GitHub credentials of its own. The frontend obtains an
//! OAuth token (see [`crate::oauth`]) and forwards it on each request; this
//! module wraps that forwarded token so it never appears in logs.

use crate::errors::{BridgeError, BridgeErrorKind, BridgeResult};
use secrecy::{ExposeSecret, SecretString};

/// A caller-supplied GitHub access token.
#[derive(Debug, Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wraps a bare token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::new(token.into()))
    }

    /// Parses an `Authorization` header value.
    ///
    /// Accepts `Bearer <token>`, `token <token>`, or a bare token, which are
    /// the forms GitHub itself accepts.
    pub fn from_header(value: &str) -> BridgeResult<Self> {
        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("token "))
            .unwrap_or(value)
            .trim();

        if token.is_empty() {
            return Err(BridgeError::new(
                BridgeErrorKind::MissingAuthorization,
                "Authorization header is empty",
            ));
        }

        Ok(Self::new(token))
    }

    /// Formats the `Authorization` header value for the GitHub API.
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    /// Gets the token prefix for logging.
    pub fn token_prefix(&self) -> &'static str {
        let exposed = self.0.expose_secret();
        if exposed.starts_with("ghp_") {
            "ghp_***"
        } else if exposed.starts_with("gho_") {
            "gho_***"
        } else if exposed.starts_with("ghs_") {
            "ghs_***"
        } else if exposed.starts_with("github_pat_") {
            "github_pat_***"
        } else {
            "***"
        }
    }
}
