//! Request handlers for the frontend-facing API.

use super::AppState;
use crate::auth::AccessToken;
use crate::errors::{BridgeError, BridgeErrorKind, BridgeResult};
use crate::oauth::TokenExchangeResponse;
use crate::services::{CreateHookRequest, PushEditsParams};
use crate::types::RepoSlug;
use crate::webhook::SIGNATURE_HEADER;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        tracing::warn!(kind = %self.kind(), status = status.as_u16(), "Request failed: {}", self);
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Extracts the forwarded GitHub token from the `Authorization` header.
fn forwarded_token(headers: &HeaderMap) -> BridgeResult<AccessToken> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            BridgeError::new(
                BridgeErrorKind::MissingAuthorization,
                "Authorization header is missing",
            )
        })?;

    AccessToken::from_header(value)
}

#[derive(Debug, Deserialize)]
pub(super) struct ReadmeRequest {
    repo_url: Option<String>,
}

/// `POST /api/get_readme`: fetches a repository README.
///
/// Anonymous read; the base64 content is forwarded as-is and decoded by the
/// frontend.
pub(super) async fn get_readme(
    State(state): State<AppState>,
    Json(request): Json<ReadmeRequest>,
) -> BridgeResult<Json<serde_json::Value>> {
    let repo_url = request
        .repo_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            BridgeError::missing_parameter("Please provide a GitHub repository URL")
        })?;
    let slug: RepoSlug = repo_url.parse()?;

    let content = state
        .client
        .readme()
        .get(&slug.owner, &slug.name, None)
        .await?;

    Ok(Json(json!({
        "readme_content": content.content.unwrap_or_default()
    })))
}

#[derive(Debug, Deserialize)]
pub(super) struct PushEditsRequest {
    repo_url: Option<String>,
    readme_content: Option<String>,
}

/// `POST /api/push_edits`: commits edited README content to the edit branch.
pub(super) async fn push_edits(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PushEditsRequest>,
) -> BridgeResult<Json<serde_json::Value>> {
    let (repo_url, readme_content) = match (
        request.repo_url.filter(|url| !url.is_empty()),
        request.readme_content.filter(|content| !content.is_empty()),
    ) {
        (Some(url), Some(content)) => (url, content),
        _ => {
            return Err(BridgeError::missing_parameter(
                "Please provide a GitHub repository URL and new readme content",
            ))
        }
    };

    let slug: RepoSlug = repo_url.parse()?;
    let token = forwarded_token(&headers)?;

    tracing::info!(repo = %slug, token = token.token_prefix(), "Pushing README edits");

    state
        .client
        .readme()
        .push_edits(
            &slug.owner,
            &slug.name,
            &readme_content,
            &PushEditsParams {
                base_branch: &state.config.default_branch,
                edit_branch: &state.config.edit_branch,
                message: "Updated README",
            },
            &token,
        )
        .await?;

    Ok(Json(json!({ "success": "README updated successfully" })))
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenQuery {
    code: Option<String>,
}

/// `GET /api/get_access_token`: exchanges an OAuth code for an access token.
pub(super) async fn get_access_token(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> BridgeResult<Json<TokenExchangeResponse>> {
    let code = query
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| BridgeError::missing_parameter("Login error with github"))?;

    let exchanger = state.oauth.as_ref().ok_or_else(|| {
        BridgeError::new(
            BridgeErrorKind::MissingOAuthCredentials,
            "OAuth client credentials are not configured",
        )
    })?;

    let response = exchanger.exchange_code(&code).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub(super) struct SetupWebhookRequest {
    repo_url: Option<String>,
}

/// `POST /setup-webhook`: registers the bridge's webhook on a repository.
pub(super) async fn setup_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SetupWebhookRequest>,
) -> BridgeResult<(StatusCode, Json<serde_json::Value>)> {
    let repo_url = request
        .repo_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            BridgeError::missing_parameter("Please provide a GitHub repository URL")
        })?;
    let slug: RepoSlug = repo_url.parse()?;
    let token = forwarded_token(&headers)?;

    let payload_url = state.config.webhook.payload_url.as_ref().ok_or_else(|| {
        BridgeError::missing_parameter(
            "Missing required parameters: webhook_payload_url and webhook_secret",
        )
    })?;

    let hook_request = CreateHookRequest::json_push_hook(
        payload_url,
        state.config.webhook.secret.expose_secret(),
    );
    let hook = state
        .client
        .hooks()
        .create(&slug.owner, &slug.name, &hook_request, &token)
        .await?;

    tracing::info!(repo = %slug, webhook_id = hook.id, "Webhook created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Webhook created successfully",
            "webhook_id": hook.id,
        })),
    ))
}

/// `POST /webhook`: inbound delivery endpoint.
///
/// The raw body bytes are what was signed, so the handler takes `Bytes` and
/// leaves all interpretation to the guard.
pub(super) async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> BridgeResult<&'static str> {
    let signature = match headers.get(SIGNATURE_HEADER) {
        Some(value) => Some(value.to_str().map_err(|_| {
            BridgeError::new(
                BridgeErrorKind::MalformedSignature,
                "Signature header is not valid UTF-8",
            )
        })?),
        None => None,
    };

    state.guard.intake(signature, &body).await?;
    Ok("OK")
}

/// `GET /healthz`: liveness probe.
pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
