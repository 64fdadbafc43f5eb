//! # docbridge
//!
//! A thin backend that bridges a documentation-editing frontend and the
//! GitHub REST API:
//! - README fetch and push-to-branch proxying
//! - OAuth authorization-code exchange
//! - Webhook registration
//! - Webhook intake with HMAC signature verification and push-event dispatch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docbridge::webhook::WebhookGuard;
//! use docbridge::{AppConfig, GitHubClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let client = GitHubClient::new(&config.github)?;
//!     let guard = WebhookGuard::new(&config.webhook);
//!
//!     let readme = client.readme().get("octocat", "Hello-World", None).await?;
//!     println!("{}", readme.name);
//!     # let _ = guard;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod types;

// Authentication
pub mod auth;

// HTTP client and transport
pub mod client;

// API Services
pub mod services;

// OAuth code exchange
pub mod oauth;

// Webhook intake
pub mod webhook;

// Observability
pub mod observability;

// HTTP server surface
pub mod server;

// Re-exports for convenience
pub use auth::AccessToken;
pub use client::GitHubClient;
pub use config::{AppConfig, AppConfigBuilder};
pub use errors::{BridgeError, BridgeErrorKind, BridgeResult};
pub use types::*;
