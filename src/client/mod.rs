//! GitHub API client implementation.

use crate::auth::AccessToken;
use crate::config::GitHubApiConfig;
use crate::errors::{BridgeError, BridgeErrorKind, BridgeResult};
use crate::services::{HooksService, ReadmeService};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};

/// GitHub error response format.
#[derive(Debug, serde::Deserialize)]
struct GitHubErrorResponse {
    message: String,
    documentation_url: Option<String>,
}

/// GitHub API client.
///
/// Carries no credentials of its own; callers pass the token forwarded by the
/// frontend, or `None` for anonymous reads.
pub struct GitHubClient {
    /// HTTP client.
    http: Client,
    /// Configuration.
    config: GitHubApiConfig,
}

impl GitHubClient {
    /// Creates a new GitHub client.
    pub fn new(config: &GitHubApiConfig) -> BridgeResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| {
                BridgeError::new(
                    BridgeErrorKind::InvalidConfiguration,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // Service accessors

    /// Gets the README service.
    pub fn readme(&self) -> ReadmeService {
        ReadmeService::new(self)
    }

    /// Gets the webhooks service.
    pub fn hooks(&self) -> HooksService {
        HooksService::new(self)
    }

    // HTTP methods

    /// Makes a GET request.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AccessToken>,
    ) -> BridgeResult<T> {
        self.request(Method::GET, path, token, Option::<&()>::None)
            .await
    }

    /// Makes a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        token: Option<&AccessToken>,
    ) -> BridgeResult<T> {
        self.request(Method::POST, path, token, Some(body)).await
    }

    /// Makes a PUT request.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        token: Option<&AccessToken>,
    ) -> BridgeResult<T> {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    // Internal methods

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        token: Option<&AccessToken>,
        body: Option<&B>,
    ) -> BridgeResult<T> {
        let response = self.execute_request(method, path, token, body).await?;

        response.json().await.map_err(|e| {
            BridgeError::deserialization(format!("Failed to deserialize response: {}", e))
        })
    }

    async fn execute_request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        token: Option<&AccessToken>,
        body: Option<&B>,
    ) -> BridgeResult<Response> {
        let url = self.build_url(path);

        tracing::debug!(method = %method, path = %path, "GitHub API request");

        let mut request = self
            .http
            .request(method, &url)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", &self.config.api_version);

        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.authorization_value());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                BridgeError::timeout(format!("Request timed out: {}", e))
            } else if e.is_connect() {
                BridgeError::new(
                    BridgeErrorKind::ConnectionFailed,
                    format!("Connection failed: {}", e),
                )
            } else {
                BridgeError::new(BridgeErrorKind::Unknown, format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        Ok(response)
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    async fn handle_error_response(response: Response) -> BridgeError {
        let status = response.status();
        let request_id = response
            .headers()
            .get("x-github-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let error_body = response.json::<GitHubErrorResponse>().await.ok();

        let message = error_body
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| format!("HTTP {} error", status.as_u16()));

        let documentation_url = error_body.as_ref().and_then(|e| e.documentation_url.clone());

        BridgeError::from_response(status.as_u16(), message, documentation_url, request_id)
    }
}
