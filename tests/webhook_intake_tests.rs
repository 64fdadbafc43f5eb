//! End-to-end webhook intake tests: signature verification through dispatch.

use async_trait::async_trait;
use docbridge::config::WebhookConfig;
use docbridge::webhook::{
    compute_signature, CommitRecord, DocumentationRegenerator, Signature, WebhookGuard,
    WebhookOutcome,
};
use docbridge::{BridgeErrorKind, BridgeResult};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use std::sync::{Arc, Mutex};

const SECRET: &str = "s3cr3t";

fn webhook_config(secret: &str) -> WebhookConfig {
    WebhookConfig {
        secret: SecretString::new(secret.to_string()),
        payload_url: None,
        main_ref: "refs/heads/main".to_string(),
    }
}

/// Regenerator that records every commit it receives.
struct RecordingRegenerator {
    seen: Mutex<Vec<CommitRecord>>,
}

impl RecordingRegenerator {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl DocumentationRegenerator for RecordingRegenerator {
    async fn regenerate(&self, commit: &CommitRecord) -> BridgeResult<()> {
        self.seen.lock().unwrap().push(commit.clone());
        Ok(())
    }
}

#[tokio::test]
async fn correctly_signed_main_push_dispatches_each_commit() {
    let body = br#"{"ref":"refs/heads/main","commits":[{"id":"abc123","message":"fix bug"}]}"#;
    let signature = compute_signature(SECRET, body).unwrap();

    let regenerator = RecordingRegenerator::new();
    let guard = WebhookGuard::with_regenerator(&webhook_config(SECRET), regenerator.clone());

    let outcome = guard.intake(Some(&signature), body).await.unwrap();
    assert_eq!(outcome, WebhookOutcome::Processed { commits: 1 });

    let seen = regenerator.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].id, "abc123");
    assert_eq!(seen[0].message, "fix bug");
}

#[tokio::test]
async fn push_to_other_ref_dispatches_nothing() {
    let body =
        br#"{"ref":"refs/heads/feature-x","commits":[{"id":"abc123","message":"fix bug"}]}"#;
    let signature = compute_signature(SECRET, body).unwrap();

    let regenerator = RecordingRegenerator::new();
    let guard = WebhookGuard::with_regenerator(&webhook_config(SECRET), regenerator.clone());

    let outcome = guard.intake(Some(&signature), body).await.unwrap();
    assert_eq!(
        outcome,
        WebhookOutcome::Ignored {
            git_ref: "refs/heads/feature-x".to_string()
        }
    );
    assert!(regenerator.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn payload_without_ref_is_rejected_after_verification() {
    let body = br#"{"commits":[{"id":"abc123","message":"fix bug"}]}"#;
    let signature = compute_signature(SECRET, body).unwrap();

    let guard = WebhookGuard::new(&webhook_config(SECRET));
    let err = guard.intake(Some(&signature), body).await.unwrap_err();

    assert_eq!(*err.kind(), BridgeErrorKind::MissingRef);
    assert_eq!(err.http_status(), 400);
}

#[test]
fn any_correctly_computed_signature_verifies() {
    let bodies: &[&[u8]] = &[
        b"",
        b"{}",
        br#"{"ref":"refs/heads/main"}"#,
        br#"{"ref":"refs/heads/main","commits":[]}"#,
        "non-ascii payload: \u{00e9}\u{4e16}".as_bytes(),
    ];

    for body in bodies {
        let header = compute_signature(SECRET, body).unwrap();
        let parsed = Signature::parse(&header).unwrap();
        assert!(
            parsed
                .verify(&SecretString::new(SECRET.to_string()), body)
                .is_ok(),
            "signature over {:?} should verify",
            body
        );
    }
}

#[test]
fn any_single_bit_flip_in_the_digest_rejects() {
    let body = br#"{"ref":"refs/heads/main","commits":[]}"#;
    let header = compute_signature(SECRET, body).unwrap();
    let (prefix, digest) = header.split_once('=').unwrap();
    let mut digest = hex::decode(digest).unwrap();

    for byte in 0..digest.len() {
        for bit in 0..8 {
            digest[byte] ^= 1 << bit;
            let mutated = format!("{}={}", prefix, hex::encode(&digest));
            digest[byte] ^= 1 << bit;

            let err = Signature::parse(&mutated)
                .unwrap()
                .verify(&SecretString::new(SECRET.to_string()), body)
                .unwrap_err();
            assert_eq!(*err.kind(), BridgeErrorKind::InvalidSignature);
        }
    }
}

#[test]
fn headers_without_separator_are_malformed_not_fatal() {
    for header in ["deadbeef", "", "sha1", "sha1deadbeef"] {
        let err = Signature::parse(header).unwrap_err();
        assert_eq!(*err.kind(), BridgeErrorKind::MalformedSignature);
    }
}

#[test]
fn wrong_algorithm_rejects_even_with_correct_digest() {
    let body = br#"{"ref":"refs/heads/main"}"#;
    let digest = compute_signature(SECRET, body)
        .unwrap()
        .split_once('=')
        .map(|(_, d)| d.to_string())
        .unwrap();

    for algorithm in ["sha256", "sha512", "md5"] {
        let err = Signature::parse(&format!("{}={}", algorithm, digest))
            .unwrap()
            .verify(&SecretString::new(SECRET.to_string()), body)
            .unwrap_err();
        assert_eq!(*err.kind(), BridgeErrorKind::UnsupportedAlgorithm);
        assert_eq!(err.http_status(), 501);
    }
}

#[tokio::test]
async fn intake_of_identical_delivery_is_idempotent() {
    let body = br#"{"ref":"refs/heads/main","commits":[{"id":"abc","message":"m"}]}"#;
    let signature = compute_signature(SECRET, body).unwrap();
    let guard = WebhookGuard::new(&webhook_config(SECRET));

    let first = guard.intake(Some(&signature), body).await.unwrap();
    let second = guard.intake(Some(&signature), body).await.unwrap();
    assert_eq!(first, second);
}
