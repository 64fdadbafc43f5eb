//! Webhook event envelope types.

use crate::errors::{BridgeError, BridgeErrorKind, BridgeResult};
use serde::Deserialize;

/// Parsed push-event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    /// Ref the push targeted (e.g. `refs/heads/main`).
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Commits included in the push. Absent in the payload means empty.
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
}

/// A commit in a push event.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    /// Commit SHA.
    pub id: String,
    /// Commit message.
    pub message: String,
}

impl PushEnvelope {
    /// Parses a verified payload body.
    ///
    /// Unparseable JSON and a parseable body with no `ref` field are distinct
    /// failures: the former is `payload_parse_error`, the latter `missing_ref`
    /// with the offending payload echoed for operator diagnostics.
    pub fn from_slice(body: &[u8]) -> BridgeResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
            BridgeError::new(
                BridgeErrorKind::PayloadParseError,
                format!("Failed to parse webhook payload: {}", e),
            )
        })?;

        if value.get("ref").is_none() {
            return Err(BridgeError::new(
                BridgeErrorKind::MissingRef,
                format!("No ref key in payload {}", value),
            ));
        }

        serde_json::from_value(value).map_err(|e| {
            BridgeError::new(
                BridgeErrorKind::PayloadParseError,
                format!("Failed to parse webhook payload: {}", e),
            )
        })
    }
}
