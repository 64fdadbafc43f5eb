//! Webhook signature parsing and verification.

use crate::errors::{BridgeError, BridgeErrorKind, BridgeResult};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// The one algorithm the upstream provider signs legacy deliveries with.
pub const SUPPORTED_ALGORITHM: &str = "sha1";

/// A parsed `algorithm=hexdigest` signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    algorithm: String,
    digest_hex: String,
}

impl Signature {
    /// Parses a signature header value.
    ///
    /// The split must yield exactly two parts; a header with no `=`, or with
    /// more than one, is rejected as malformed rather than indexed into.
    pub fn parse(header: &str) -> BridgeResult<Self> {
        let mut parts = header.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(algorithm), Some(digest_hex), None) => Ok(Self {
                algorithm: algorithm.to_string(),
                digest_hex: digest_hex.to_string(),
            }),
            _ => Err(BridgeError::new(
                BridgeErrorKind::MalformedSignature,
                "Signature header must be in algorithm=hexdigest form",
            )),
        }
    }

    /// Gets the declared algorithm identifier.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Gets the hex-encoded digest.
    pub fn digest_hex(&self) -> &str {
        &self.digest_hex
    }

    /// Verifies this signature against the raw body bytes.
    ///
    /// Uses constant-time comparison to prevent timing attacks. The computed
    /// digest is never part of the returned error.
    pub fn verify(&self, secret: &SecretString, body: &[u8]) -> BridgeResult<()> {
        if self.algorithm != SUPPORTED_ALGORITHM {
            return Err(BridgeError::new(
                BridgeErrorKind::UnsupportedAlgorithm,
                format!(
                    "Operation not supported: expected HMAC-{} signatures, got {:?}",
                    SUPPORTED_ALGORITHM.to_uppercase(),
                    self.algorithm
                ),
            ));
        }

        // A digest that is not valid hex cannot match any computed HMAC.
        let digest = hex::decode(&self.digest_hex)
            .map_err(|_| BridgeError::invalid_signature("Invalid signature"))?;

        let mut mac = HmacSha1::new_from_slice(secret.expose_secret().as_bytes())
            .map_err(|e| BridgeError::new(
                BridgeErrorKind::Unknown,
                format!("Failed to create HMAC: {}", e),
            ))?;
        mac.update(body);

        mac.verify_slice(&digest)
            .map_err(|_| BridgeError::invalid_signature("Invalid signature"))
    }
}

/// Computes the signature header value for a payload.
pub fn compute_signature(secret: &str, body: &[u8]) -> BridgeResult<String> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).map_err(|e| {
        BridgeError::new(
            BridgeErrorKind::Unknown,
            format!("Failed to create HMAC: {}", e),
        )
    })?;

    mac.update(body);
    let result = mac.finalize();
    Ok(format!(
        "{}={}",
        SUPPORTED_ALGORITHM,
        hex::encode(result.into_bytes())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string())
    }

    #[test]
    fn test_parse_valid_header() {
        let sig = Signature::parse("sha1=deadbeef").unwrap();
        assert_eq!(sig.algorithm(), "sha1");
        assert_eq!(sig.digest_hex(), "deadbeef");
    }

    #[test_case("deadbeef" ; "no separator")]
    #[test_case("sha1=dead=beef" ; "two separators")]
    #[test_case("" ; "empty header")]
    fn test_parse_malformed_header(header: &str) {
        let err = Signature::parse(header).unwrap_err();
        assert_eq!(*err.kind(), BridgeErrorKind::MalformedSignature);
    }

    #[test]
    fn test_verify_roundtrip() {
        let body = b"{\"ref\":\"refs/heads/main\"}";
        let header = compute_signature("s3cr3t", body).unwrap();

        let sig = Signature::parse(&header).unwrap();
        assert!(sig.verify(&secret("s3cr3t"), body).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let body = b"payload";
        let header = compute_signature("s3cr3t", body).unwrap();

        let sig = Signature::parse(&header).unwrap();
        let err = sig.verify(&secret("other"), body).unwrap_err();
        assert_eq!(*err.kind(), BridgeErrorKind::InvalidSignature);
    }

    #[test_case("sha256" ; "sha256")]
    #[test_case("md5" ; "md5")]
    #[test_case("" ; "empty algorithm")]
    fn test_unsupported_algorithm(algorithm: &str) {
        // Digest correctness is irrelevant once the algorithm is wrong.
        let body = b"payload";
        let digest = compute_signature("s3cr3t", body)
            .unwrap()
            .split_off(SUPPORTED_ALGORITHM.len() + 1);

        let sig = Signature::parse(&format!("{}={}", algorithm, digest)).unwrap();
        let err = sig.verify(&secret("s3cr3t"), body).unwrap_err();
        assert_eq!(*err.kind(), BridgeErrorKind::UnsupportedAlgorithm);
    }

    #[test]
    fn test_non_hex_digest_is_invalid_signature() {
        let sig = Signature::parse("sha1=not-hex-at-all").unwrap();
        let err = sig.verify(&secret("s3cr3t"), b"payload").unwrap_err();
        assert_eq!(*err.kind(), BridgeErrorKind::InvalidSignature);
    }

    #[test]
    fn test_error_never_contains_digest() {
        let body = b"payload";
        let header = compute_signature("other", body).unwrap();
        let expected = compute_signature("s3cr3t", body).unwrap();

        let sig = Signature::parse(&header).unwrap();
        let err = sig.verify(&secret("s3cr3t"), body).unwrap_err();
        assert!(!format!("{}", err).contains(&expected[5..]));
    }
}
