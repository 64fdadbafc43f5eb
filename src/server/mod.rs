//! HTTP server surface.
//!
//! Routes requests from the documentation-editing frontend to the GitHub
//! client, the OAuth exchanger, and the webhook guard. All shared state is
//! built once at startup and cloned cheaply per request.

mod handlers;

use crate::client::GitHubClient;
use crate::config::AppConfig;
use crate::errors::BridgeResult;
use crate::oauth::OAuthExchanger;
use crate::observability;
use crate::webhook::WebhookGuard;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Resolved configuration.
    pub config: Arc<AppConfig>,
    /// GitHub API client.
    pub client: Arc<GitHubClient>,
    /// OAuth code exchanger, when credentials are configured.
    pub oauth: Option<Arc<OAuthExchanger>>,
    /// Webhook intake guard.
    pub guard: Arc<WebhookGuard>,
}

/// Builds the shared state from configuration.
pub fn build_state(config: AppConfig) -> BridgeResult<AppState> {
    let client = Arc::new(GitHubClient::new(&config.github)?);
    let oauth = match config.oauth.clone() {
        Some(oauth_config) => Some(Arc::new(OAuthExchanger::new(oauth_config)?)),
        None => None,
    };
    let guard = Arc::new(WebhookGuard::new(&config.webhook));

    Ok(AppState {
        config: Arc::new(config),
        client,
        oauth,
        guard,
    })
}

/// Builds the application router.
///
/// The frontend runs on another origin during development, so CORS is wide
/// open the way the original backend left it.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/get_readme", post(handlers::get_readme))
        .route("/api/push_edits", post(handlers::push_edits))
        .route("/api/get_access_token", get(handlers::get_access_token))
        .route("/setup-webhook", post(handlers::setup_webhook))
        .route("/webhook", post(handlers::receive_webhook))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http().make_span_with(observability::request_span))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
