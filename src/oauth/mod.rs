//! OAuth authorization-code exchange.
//!
//! The frontend completes the GitHub OAuth redirect and hands the resulting
//! code to the bridge, which swaps it for an access token using the client
//! credentials configured at startup. The token itself is returned to the
//! frontend; the bridge does not retain it.

use crate::config::OAuthConfig;
use crate::errors::{BridgeError, BridgeErrorKind, BridgeResult};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Exchanges authorization codes for access tokens.
pub struct OAuthExchanger {
    http: reqwest::Client,
    config: OAuthConfig,
}

impl OAuthExchanger {
    /// Creates a new exchanger.
    pub fn new(config: OAuthConfig) -> BridgeResult<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            BridgeError::new(
                BridgeErrorKind::InvalidConfiguration,
                format!("Failed to create HTTP client: {}", e),
            )
        })?;

        Ok(Self { http, config })
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> BridgeResult<TokenExchangeResponse> {
        if code.is_empty() {
            return Err(BridgeError::missing_parameter("Authorization code is empty"));
        }

        let response = self
            .http
            .get(&self.config.token_url)
            .query(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret()),
                ("code", code),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BridgeError::timeout(format!("Token exchange timed out: {}", e))
                } else {
                    BridgeError::new(
                        BridgeErrorKind::ConnectionFailed,
                        format!("Token exchange failed: {}", e),
                    )
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::new(
                BridgeErrorKind::UpstreamError,
                format!("Failed to fetch access token: {}", body),
            )
            .with_status(status.as_u16()));
        }

        response.json().await.map_err(|e| {
            BridgeError::deserialization(format!("Failed to parse token response: {}", e))
        })
    }
}

/// Token exchange response, forwarded to the frontend.
///
/// GitHub reports exchange failures (expired code, bad client secret) with a
/// 200 status and an `error` body, so both shapes live in one struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenExchangeResponse {
    /// The access token, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Token type (`bearer`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Granted scopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Error code, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_roundtrip() {
        let json = serde_json::json!({
            "access_token": "gho_abc123",
            "token_type": "bearer",
            "scope": "repo"
        });

        let response: TokenExchangeResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.access_token.as_deref(), Some("gho_abc123"));
        assert!(response.error.is_none());

        let serialized = serde_json::to_value(&response).unwrap();
        assert!(serialized.get("error").is_none());
    }

    #[test]
    fn test_error_response_deserializes() {
        let json = serde_json::json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        });

        let response: TokenExchangeResponse = serde_json::from_value(json).unwrap();
        assert!(response.access_token.is_none());
        assert_eq!(response.error.as_deref(), Some("bad_verification_code"));
    }
}
