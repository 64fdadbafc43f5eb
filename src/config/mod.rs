//! Configuration types for the bridge.
//!
//! Everything is resolved once at startup into an immutable [`AppConfig`];
//! nothing reads the environment after boot.

use crate::errors::{BridgeError, BridgeErrorKind, BridgeResult};
use secrecy::{ExposeSecret, SecretString};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use url::Url;

/// Default GitHub API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default GitHub API version (date-based).
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

/// Default OAuth token exchange endpoint.
pub const DEFAULT_OAUTH_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = "docbridge/0.1.0";

/// Default port the server binds to.
pub const DEFAULT_PORT: u16 = 5000;

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT))
}

/// Placeholder webhook secret used when `WEBHOOK_SECRET` is unset.
///
/// Insecure on purpose: it keeps local development working, and startup logs
/// a warning whenever it is in effect.
pub const INSECURE_DEFAULT_SECRET: &str = "default_secret_if_not_set";

/// Default branch README edits are based on.
pub const DEFAULT_BRANCH: &str = "main";

/// Default branch README edits are pushed to.
pub const DEFAULT_EDIT_BRANCH: &str = "test-branch";

/// GitHub API client configuration.
#[derive(Debug, Clone)]
pub struct GitHubApiConfig {
    /// API base URL.
    pub base_url: String,
    /// API version header.
    pub api_version: String,
    /// User-Agent header.
    pub user_agent: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
}

impl Default for GitHubApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// OAuth application credentials for the code exchange.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth App client ID.
    pub client_id: String,
    /// OAuth App client secret.
    pub client_secret: SecretString,
    /// Token exchange endpoint.
    pub token_url: String,
}

/// Webhook intake configuration.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Shared secret for HMAC signature verification.
    pub secret: SecretString,
    /// Publicly reachable URL GitHub should deliver events to.
    pub payload_url: Option<String>,
    /// Git reference that triggers processing (e.g. `refs/heads/main`).
    pub main_ref: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: SecretString::new(INSECURE_DEFAULT_SECRET.to_string()),
            payload_url: None,
            main_ref: format!("refs/heads/{}", DEFAULT_BRANCH),
        }
    }
}

impl WebhookConfig {
    /// Returns true if the insecure placeholder secret is in effect.
    pub fn uses_insecure_secret(&self) -> bool {
        self.secret.expose_secret() == INSECURE_DEFAULT_SECRET
    }
}

/// Bridge configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the server binds to.
    pub bind_addr: SocketAddr,
    /// GitHub API client configuration.
    pub github: GitHubApiConfig,
    /// OAuth credentials, when configured.
    pub oauth: Option<OAuthConfig>,
    /// Webhook intake configuration.
    pub webhook: WebhookConfig,
    /// Branch README edits are based on.
    pub default_branch: String,
    /// Branch README edits are pushed to.
    pub edit_branch: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            github: GitHubApiConfig::default(),
            oauth: None,
            webhook: WebhookConfig::default(),
            default_branch: DEFAULT_BRANCH.to_string(),
            edit_branch: DEFAULT_EDIT_BRANCH.to_string(),
        }
    }
}

impl AppConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> BridgeResult<Self> {
        let mut builder = Self::builder();

        if let Ok(addr) = std::env::var("DOCBRIDGE_BIND_ADDR") {
            builder = builder.bind_addr(&addr)?;
        }
        if let Ok(url) = std::env::var("GITHUB_BASE_URL") {
            builder = builder.base_url(url);
        }
        if let (Ok(id), Ok(secret)) = (
            std::env::var("GITHUB_CLIENT_ID"),
            std::env::var("GITHUB_CLIENT_SECRET"),
        ) {
            builder = builder.oauth(id, secret);
        }
        if let Ok(url) = std::env::var("GITHUB_OAUTH_TOKEN_URL") {
            builder = builder.oauth_token_url(url);
        }
        if let Ok(secret) = std::env::var("WEBHOOK_SECRET") {
            builder = builder.webhook_secret(secret);
        }
        if let Ok(url) = std::env::var("WEBHOOK_PAYLOAD_URL") {
            builder = builder.webhook_payload_url(url);
        }
        if let Ok(branch) = std::env::var("DOCBRIDGE_DEFAULT_BRANCH") {
            builder = builder.default_branch(branch);
        }
        if let Ok(branch) = std::env::var("DOCBRIDGE_EDIT_BRANCH") {
            builder = builder.edit_branch(branch);
        }

        builder.build()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BridgeResult<()> {
        if self.github.base_url.is_empty() {
            return Err(BridgeError::new(
                BridgeErrorKind::InvalidBaseUrl,
                "Base URL cannot be empty",
            ));
        }

        Url::parse(&self.github.base_url).map_err(|e| {
            BridgeError::new(
                BridgeErrorKind::InvalidBaseUrl,
                format!("Invalid base URL: {}", e),
            )
        })?;

        if !self.github.base_url.starts_with("http://")
            && !self.github.base_url.starts_with("https://")
        {
            return Err(BridgeError::new(
                BridgeErrorKind::InvalidBaseUrl,
                "Base URL must start with http:// or https://",
            ));
        }

        if self.github.user_agent.is_empty() {
            return Err(BridgeError::configuration(
                "User-Agent is required by GitHub API",
            ));
        }

        if let Some(ref oauth) = self.oauth {
            if oauth.client_id.is_empty() {
                return Err(BridgeError::configuration("OAuth client ID cannot be empty"));
            }
            Url::parse(&oauth.token_url).map_err(|e| {
                BridgeError::configuration(format!("Invalid OAuth token URL: {}", e))
            })?;
        }

        if let Some(ref payload_url) = self.webhook.payload_url {
            Url::parse(payload_url).map_err(|e| {
                BridgeError::configuration(format!("Invalid webhook payload URL: {}", e))
            })?;
        }

        if self.default_branch.is_empty() || self.edit_branch.is_empty() {
            return Err(BridgeError::configuration("Branch names cannot be empty"));
        }

        Ok(())
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    bind_addr: Option<SocketAddr>,
    base_url: Option<String>,
    api_version: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    oauth_client: Option<(String, SecretString)>,
    oauth_token_url: Option<String>,
    webhook_secret: Option<SecretString>,
    webhook_payload_url: Option<String>,
    default_branch: Option<String>,
    edit_branch: Option<String>,
}

impl AppConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bind address.
    pub fn bind_addr(mut self, addr: &str) -> BridgeResult<Self> {
        let parsed = addr.parse().map_err(|e| {
            BridgeError::configuration(format!("Invalid bind address {:?}: {}", addr, e))
        })?;
        self.bind_addr = Some(parsed);
        Ok(self)
    }

    /// Sets the GitHub API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the API version header.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the OAuth client credentials.
    pub fn oauth(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.oauth_client = Some((client_id.into(), SecretString::new(client_secret.into())));
        self
    }

    /// Sets the OAuth token exchange endpoint.
    pub fn oauth_token_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_token_url = Some(url.into());
        self
    }

    /// Sets the webhook shared secret.
    pub fn webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(SecretString::new(secret.into()));
        self
    }

    /// Sets the webhook payload URL.
    pub fn webhook_payload_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_payload_url = Some(url.into());
        self
    }

    /// Sets the branch README edits are based on.
    pub fn default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    /// Sets the branch README edits are pushed to.
    pub fn edit_branch(mut self, branch: impl Into<String>) -> Self {
        self.edit_branch = Some(branch.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> BridgeResult<AppConfig> {
        let default_branch = self.default_branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string());

        let config = AppConfig {
            bind_addr: self.bind_addr.unwrap_or_else(default_bind_addr),
            github: GitHubApiConfig {
                base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                api_version: self
                    .api_version
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                user_agent: self
                    .user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
                connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            },
            oauth: self.oauth_client.map(|(client_id, client_secret)| OAuthConfig {
                client_id,
                client_secret,
                token_url: self
                    .oauth_token_url
                    .unwrap_or_else(|| DEFAULT_OAUTH_TOKEN_URL.to_string()),
            }),
            webhook: WebhookConfig {
                secret: self
                    .webhook_secret
                    .unwrap_or_else(|| SecretString::new(INSECURE_DEFAULT_SECRET.to_string())),
                payload_url: self.webhook_payload_url,
                main_ref: format!("refs/heads/{}", default_branch),
            },
            default_branch,
            edit_branch: self.edit_branch.unwrap_or_else(|| DEFAULT_EDIT_BRANCH.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.github.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.webhook.main_ref, "refs/heads/main");
        assert!(config.oauth.is_none());
        assert!(config.webhook.uses_insecure_secret());
    }

    #[test]
    fn test_config_builder() {
        let config = AppConfig::builder()
            .base_url("https://github.example.com/api/v3")
            .user_agent("test-bridge/1.0")
            .webhook_secret("s3cr3t")
            .oauth("client-id", "client-secret")
            .default_branch("trunk")
            .build()
            .unwrap();

        assert_eq!(config.github.base_url, "https://github.example.com/api/v3");
        assert_eq!(config.github.user_agent, "test-bridge/1.0");
        assert_eq!(config.webhook.main_ref, "refs/heads/trunk");
        assert!(!config.webhook.uses_insecure_secret());
        assert!(config.oauth.is_some());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = AppConfig::builder().base_url("invalid-url").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_bind_addr() {
        let result = AppConfig::builder().bind_addr("not-an-addr");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_payload_url() {
        let result = AppConfig::builder()
            .webhook_payload_url("not a url")
            .build();
        assert!(result.is_err());
    }
}
