//! Webhook intake: signature verification, envelope parsing, and dispatch.
//!
//! Every inbound delivery goes through the [`WebhookGuard`], which verifies
//! the HMAC signature over the raw body bytes before the body is interpreted
//! at all, then routes main-branch push events to the documentation
//! regenerator.

mod events;
mod guard;
mod signature;

pub use events::{CommitRecord, PushEnvelope};
pub use guard::{DocumentationRegenerator, NoopRegenerator, WebhookGuard, WebhookOutcome};
pub use signature::{compute_signature, Signature, SIGNATURE_HEADER, SUPPORTED_ALGORITHM};
