//! The webhook intake guard.

use crate::config::WebhookConfig;
use crate::errors::{BridgeError, BridgeErrorKind, BridgeResult};
use crate::webhook::events::{CommitRecord, PushEnvelope};
use crate::webhook::signature::Signature;
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;

/// Downstream collaborator invoked once per main-branch commit.
#[async_trait]
pub trait DocumentationRegenerator: Send + Sync {
    /// Regenerates documentation for a pushed commit.
    async fn regenerate(&self, commit: &CommitRecord) -> BridgeResult<()>;
}

/// Placeholder regenerator until the generation pipeline exists.
pub struct NoopRegenerator;

#[async_trait]
impl DocumentationRegenerator for NoopRegenerator {
    async fn regenerate(&self, _commit: &CommitRecord) -> BridgeResult<()> {
        Ok(())
    }
}

/// Outcome of an accepted webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A main-branch push was processed.
    Processed {
        /// Number of commits dispatched to the regenerator.
        commits: usize,
    },
    /// The delivery verified but targeted another ref; nothing was done.
    Ignored {
        /// The ref the delivery targeted.
        git_ref: String,
    },
}

/// Validates inbound deliveries and dispatches main-branch pushes.
///
/// The shared secret is fixed configuration, never derived from the request,
/// and signature verification always runs before the body is interpreted as
/// JSON. Verification itself is a pure function of (header, body, secret), so
/// concurrent deliveries need no coordination.
pub struct WebhookGuard {
    secret: SecretString,
    main_ref: String,
    regenerator: Arc<dyn DocumentationRegenerator>,
}

impl WebhookGuard {
    /// Creates a guard with the placeholder regenerator.
    pub fn new(config: &WebhookConfig) -> Self {
        Self::with_regenerator(config, Arc::new(NoopRegenerator))
    }

    /// Creates a guard with an explicit regenerator.
    pub fn with_regenerator(
        config: &WebhookConfig,
        regenerator: Arc<dyn DocumentationRegenerator>,
    ) -> Self {
        Self {
            secret: config.secret.clone(),
            main_ref: config.main_ref.clone(),
            regenerator,
        }
    }

    /// Verifies a delivery's signature against its raw body.
    pub fn verify(&self, signature_header: Option<&str>, body: &[u8]) -> BridgeResult<()> {
        let header = signature_header.ok_or_else(|| {
            BridgeError::new(
                BridgeErrorKind::MissingSignature,
                "Missing X-Hub-Signature required for webhook validation",
            )
        })?;

        Signature::parse(header)?.verify(&self.secret, body)
    }

    /// Verifies and processes one delivery.
    ///
    /// A non-main ref verifies, parses, and is then deliberately left alone;
    /// redelivery on failure is the upstream provider's job, so no retries
    /// happen here.
    pub async fn intake(
        &self,
        signature_header: Option<&str>,
        body: &[u8],
    ) -> BridgeResult<WebhookOutcome> {
        self.verify(signature_header, body)?;

        let envelope = PushEnvelope::from_slice(body)?;

        if envelope.git_ref != self.main_ref {
            tracing::debug!(git_ref = %envelope.git_ref, "Ignoring push to non-main ref");
            return Ok(WebhookOutcome::Ignored {
                git_ref: envelope.git_ref,
            });
        }

        tracing::info!(git_ref = %envelope.git_ref, "New commit to main branch detected");
        for commit in &envelope.commits {
            tracing::info!(
                commit_id = %commit.id,
                message = %commit.message,
                "Dispatching pushed commit"
            );
            self.regenerator.regenerate(commit).await?;
        }

        Ok(WebhookOutcome::Processed {
            commits: envelope.commits.len(),
        })
    }
}
