//! Error types for the bridge.

use std::fmt;
use thiserror::Error;

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Error kinds for categorizing bridge errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeErrorKind {
    // Configuration errors
    /// Invalid base URL.
    InvalidBaseUrl,
    /// Missing OAuth client credentials.
    MissingOAuthCredentials,
    /// Invalid configuration.
    InvalidConfiguration,

    // Request errors
    /// Missing required parameter.
    MissingParameter,
    /// Invalid parameter.
    InvalidParameter,
    /// Missing Authorization header.
    MissingAuthorization,
    /// Bad credentials.
    BadCredentials,

    // Upstream errors
    /// Resource not found (404).
    NotFound,
    /// Access forbidden (403).
    Forbidden,
    /// Unprocessable entity (422).
    UnprocessableEntity,
    /// Upstream server error (5xx).
    UpstreamError,
    /// Connection failed.
    ConnectionFailed,
    /// Request timeout.
    Timeout,
    /// Failed to deserialize response.
    DeserializationError,

    // Webhook intake errors
    /// Signature header absent from the request.
    MissingSignature,
    /// Signature header not in `algorithm=hexdigest` form.
    MalformedSignature,
    /// Signature algorithm other than the supported one.
    UnsupportedAlgorithm,
    /// Digest does not match the computed HMAC.
    InvalidSignature,
    /// Payload has no `ref` field.
    MissingRef,
    /// Payload is not parseable JSON.
    PayloadParseError,

    // Generic
    /// Unknown error.
    Unknown,
}

impl fmt::Display for BridgeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl => write!(f, "invalid_base_url"),
            Self::MissingOAuthCredentials => write!(f, "missing_oauth_credentials"),
            Self::InvalidConfiguration => write!(f, "invalid_configuration"),
            Self::MissingParameter => write!(f, "missing_parameter"),
            Self::InvalidParameter => write!(f, "invalid_parameter"),
            Self::MissingAuthorization => write!(f, "missing_authorization"),
            Self::BadCredentials => write!(f, "bad_credentials"),
            Self::NotFound => write!(f, "not_found"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::UnprocessableEntity => write!(f, "unprocessable_entity"),
            Self::UpstreamError => write!(f, "upstream_error"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DeserializationError => write!(f, "deserialization_error"),
            Self::MissingSignature => write!(f, "missing_signature"),
            Self::MalformedSignature => write!(f, "malformed_signature"),
            Self::UnsupportedAlgorithm => write!(f, "unsupported_algorithm"),
            Self::InvalidSignature => write!(f, "invalid_signature"),
            Self::MissingRef => write!(f, "missing_ref"),
            Self::PayloadParseError => write!(f, "payload_parse_error"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Bridge error with upstream context.
#[derive(Error, Debug)]
pub struct BridgeError {
    /// Error kind.
    kind: BridgeErrorKind,
    /// Error message.
    message: String,
    /// HTTP status code returned by the upstream API.
    status_code: Option<u16>,
    /// GitHub request ID.
    request_id: Option<String>,
    /// Documentation URL.
    documentation_url: Option<String>,
    /// Underlying cause.
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(code) = self.status_code {
            write!(f, " (HTTP {})", code)?;
        }
        if let Some(ref id) = self.request_id {
            write!(f, " [request_id: {}]", id)?;
        }
        Ok(())
    }
}

impl BridgeError {
    /// Creates a new bridge error.
    pub fn new(kind: BridgeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            request_id: None,
            documentation_url: None,
            cause: None,
        }
    }

    /// Sets the upstream HTTP status code.
    pub fn with_status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Sets the GitHub request ID.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the documentation URL.
    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &BridgeErrorKind {
        &self.kind
    }

    /// Gets the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets the upstream HTTP status code.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Gets the request ID.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Gets the documentation URL.
    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation_url.as_deref()
    }

    /// HTTP status the bridge itself reports for this error.
    ///
    /// Client mistakes are 400-class, an unsupported signature algorithm is
    /// 501 (protocol mismatch, not a malformed request), and upstream API
    /// failures surface as 500 the way the original backend reported them.
    pub fn http_status(&self) -> u16 {
        match self.kind {
            BridgeErrorKind::MissingParameter
            | BridgeErrorKind::InvalidParameter
            | BridgeErrorKind::MissingSignature
            | BridgeErrorKind::MalformedSignature
            | BridgeErrorKind::InvalidSignature
            | BridgeErrorKind::MissingRef
            | BridgeErrorKind::PayloadParseError => 400,
            BridgeErrorKind::MissingAuthorization => 401,
            BridgeErrorKind::UnsupportedAlgorithm => 501,
            _ => 500,
        }
    }

    /// Creates an error from an upstream HTTP status and GitHub error response.
    pub fn from_response(
        status: u16,
        message: String,
        documentation_url: Option<String>,
        request_id: Option<String>,
    ) -> Self {
        let kind = Self::kind_from_status(status);
        let mut error = Self::new(kind, message).with_status(status);

        if let Some(url) = documentation_url {
            error = error.with_documentation_url(url);
        }
        if let Some(id) = request_id {
            error = error.with_request_id(id);
        }

        error
    }

    /// Maps an upstream HTTP status code to an error kind.
    fn kind_from_status(status: u16) -> BridgeErrorKind {
        match status {
            400 => BridgeErrorKind::InvalidParameter,
            401 => BridgeErrorKind::BadCredentials,
            403 => BridgeErrorKind::Forbidden,
            404 => BridgeErrorKind::NotFound,
            422 => BridgeErrorKind::UnprocessableEntity,
            500..=599 => BridgeErrorKind::UpstreamError,
            _ => BridgeErrorKind::Unknown,
        }
    }

    // Convenience constructors

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::InvalidConfiguration, message)
    }

    /// Creates a missing-parameter error.
    pub fn missing_parameter(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::MissingParameter, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::Timeout, message)
    }

    /// Creates a webhook signature error.
    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::InvalidSignature, message)
    }

    /// Creates a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(BridgeErrorKind::DeserializationError, message)
    }
}
