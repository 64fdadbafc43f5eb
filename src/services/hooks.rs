//! Webhook registration against the GitHub API.

use crate::auth::AccessToken;
use crate::client::GitHubClient;
use crate::errors::BridgeResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events the bridge subscribes to when registering a hook.
pub const HOOK_EVENTS: &[&str] = &["push", "pull_request", "create"];

/// Service for repository webhook operations.
pub struct HooksService<'a> {
    client: &'a GitHubClient,
}

impl<'a> HooksService<'a> {
    /// Creates a new hooks service.
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Registers a webhook on a repository.
    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        request: &CreateHookRequest,
        token: &AccessToken,
    ) -> BridgeResult<Hook> {
        self.client
            .post(&format!("/repos/{}/{}/hooks", owner, repo), request, Some(token))
            .await
    }
}

/// Request to create a webhook.
#[derive(Debug, Clone, Serialize)]
pub struct CreateHookRequest {
    /// Hook delivery configuration.
    pub config: HookConfig,
    /// Events the hook fires on.
    pub events: Vec<String>,
    /// Whether the hook is active.
    pub active: bool,
}

impl CreateHookRequest {
    /// Creates the standard bridge hook: JSON deliveries for push,
    /// pull-request, and branch-create events.
    pub fn json_push_hook(payload_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            config: HookConfig {
                url: payload_url.into(),
                content_type: "json".to_string(),
                secret: Some(secret.into()),
            },
            events: HOOK_EVENTS.iter().map(|e| e.to_string()).collect(),
            active: true,
        }
    }
}

/// Webhook delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Delivery URL.
    pub url: String,
    /// Payload content type.
    pub content_type: String,
    /// Shared secret (set on creation; GitHub masks it in responses).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// A registered webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct Hook {
    /// Hook ID.
    pub id: u64,
    /// Events the hook fires on.
    pub events: Vec<String>,
    /// Whether the hook is active.
    pub active: bool,
    /// Hook delivery configuration.
    pub config: HookConfig,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_push_hook_shape() {
        let request = CreateHookRequest::json_push_hook("https://bridge.example.com/webhook", "s3cr3t");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["config"]["url"], "https://bridge.example.com/webhook");
        assert_eq!(json["config"]["content_type"], "json");
        assert_eq!(json["config"]["secret"], "s3cr3t");
        assert_eq!(json["active"], true);
        assert_eq!(json["events"], serde_json::json!(["push", "pull_request", "create"]));
    }

    #[test]
    fn test_hook_deserializes_without_secret() {
        let json = serde_json::json!({
            "id": 42,
            "events": ["push"],
            "active": true,
            "config": { "url": "https://bridge.example.com/webhook", "content_type": "json" },
            "created_at": "2024-01-15T10:00:00Z"
        });

        let hook: Hook = serde_json::from_value(json).unwrap();
        assert_eq!(hook.id, 42);
        assert!(hook.config.secret.is_none());
    }
}
