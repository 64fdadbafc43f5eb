//! docbridge server binary.

use anyhow::Context;
use docbridge::server;
use docbridge::AppConfig;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    docbridge::observability::init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    if config.webhook.uses_insecure_secret() {
        warn!("WEBHOOK_SECRET is unset; using the insecure placeholder secret");
    }
    if config.oauth.is_none() {
        warn!("OAuth credentials are not configured; /api/get_access_token will fail");
    }
    if config.webhook.payload_url.is_none() {
        warn!("WEBHOOK_PAYLOAD_URL is unset; /setup-webhook will fail");
    }

    let bind_addr = config.bind_addr;
    let state = server::build_state(config).context("Failed to initialize services")?;
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!(addr = %bind_addr, "docbridge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
