//! Logging setup and request tracing.

use axum::body::Body;
use axum::http::header::{HeaderValue, AUTHORIZATION};
use axum::http::Request;
use tracing::Span;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Honors `RUST_LOG`; defaults to info-level output for the bridge and the
/// HTTP trace layer.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docbridge=info,tower_http=info".into()),
        )
        .init();
}

/// Headers whose values must never reach the logs.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Formats a header value for logging, redacting sensitive headers.
pub fn display_header(name: &str, value: Option<&HeaderValue>) -> String {
    match value {
        None => "none".to_string(),
        Some(_) if SENSITIVE_HEADERS.contains(&name.to_lowercase().as_str()) => {
            "[REDACTED]".to_string()
        }
        Some(value) => value.to_str().unwrap_or("[non-ascii]").to_string(),
    }
}

/// Builds the per-request span for the HTTP trace layer.
///
/// The `Authorization` header carries the frontend's GitHub token, so only
/// its presence is recorded.
pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        authorization = %display_header(
            AUTHORIZATION.as_str(),
            request.headers().get(AUTHORIZATION),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_value_is_redacted() {
        let value = HeaderValue::from_static("Bearer gho_abc123");
        let shown = display_header("authorization", Some(&value));
        assert_eq!(shown, "[REDACTED]");
        assert!(!shown.contains("gho_abc123"));
    }

    #[test]
    fn test_redaction_is_case_insensitive() {
        let value = HeaderValue::from_static("token ghp_abc123");
        assert_eq!(display_header("Authorization", Some(&value)), "[REDACTED]");
    }

    #[test]
    fn test_ordinary_headers_pass_through() {
        let value = HeaderValue::from_static("application/json");
        assert_eq!(
            display_header("content-type", Some(&value)),
            "application/json"
        );
        assert_eq!(display_header("content-type", None), "none");
    }
}
