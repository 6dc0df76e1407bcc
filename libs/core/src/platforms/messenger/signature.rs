use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use thiserror::Error;

/// Header carrying `sha1=<hex>` over the raw body.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";
/// Header carrying `sha256=<hex>` over the raw body.
pub const SIGNATURE_256_HEADER: &str = "X-Hub-Signature-256";

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("signature header missing")]
    MissingSignature,
    #[error("signature header malformed")]
    MalformedSignature,
    #[error("signature does not match payload")]
    SignatureMismatch,
    #[error("hub.mode `{0}` is not `subscribe`")]
    ModeMismatch(String),
    #[error("hub.verify_token does not match")]
    TokenMismatch,
}

/// Checks an `X-Hub-Signature` / `X-Hub-Signature-256` value against `body`.
pub fn verify_signature(
    app_secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), VerificationError> {
    let signature = signature
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(VerificationError::MissingSignature)?;
    let (algo, hex_digest) = signature
        .split_once('=')
        .ok_or(VerificationError::MalformedSignature)?;
    let provided = hex::decode(hex_digest).map_err(|_| VerificationError::MalformedSignature)?;

    let verified = match algo.to_ascii_lowercase().as_str() {
        "sha1" => HmacSha1::new_from_slice(app_secret.as_bytes())
            .map_err(|_| VerificationError::MalformedSignature)?
            .chain_update(body)
            .verify_slice(&provided),
        "sha256" => HmacSha256::new_from_slice(app_secret.as_bytes())
            .map_err(|_| VerificationError::MalformedSignature)?
            .chain_update(body)
            .verify_slice(&provided),
        _ => return Err(VerificationError::MalformedSignature),
    };
    verified.map_err(|_| VerificationError::SignatureMismatch)
}

/// Validates the subscription handshake parameters.
pub fn verify_handshake(
    mode: Option<&str>,
    token: Option<&str>,
    expected_token: &str,
) -> Result<(), VerificationError> {
    let mode = mode.unwrap_or_default();
    if mode != "subscribe" {
        return Err(VerificationError::ModeMismatch(mode.to_string()));
    }
    if token != Some(expected_token) {
        return Err(VerificationError::TokenMismatch);
    }
    Ok(())
}

/// Computes a `sha1=` header value; used by tests and local tooling.
pub fn sign_sha1(app_secret: &str, body: &[u8]) -> String {
    let mut mac = match HmacSha1::new_from_slice(app_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    format!("sha1={}", hex::encode(mac.finalize().into_bytes()))
}

/// Computes a `sha256=` header value.
pub fn sign_sha256(app_secret: &str, body: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"object":"page","entry":[]}"#;

    #[test]
    fn accepts_both_digests() {
        assert!(verify_signature("secret", BODY, Some(&sign_sha1("secret", BODY))).is_ok());
        assert!(verify_signature("secret", BODY, Some(&sign_sha256("secret", BODY))).is_ok());
    }

    #[test]
    fn rejects_wrong_secret() {
        let sig = sign_sha1("other", BODY);
        assert_eq!(
            verify_signature("secret", BODY, Some(&sig)),
            Err(VerificationError::SignatureMismatch)
        );
    }

    #[test]
    fn rejects_missing_and_malformed() {
        assert_eq!(
            verify_signature("secret", BODY, None),
            Err(VerificationError::MissingSignature)
        );
        assert_eq!(
            verify_signature("secret", BODY, Some("deadbeef")),
            Err(VerificationError::MalformedSignature)
        );
        assert_eq!(
            verify_signature("secret", BODY, Some("md5=00")),
            Err(VerificationError::MalformedSignature)
        );
        assert_eq!(
            verify_signature("secret", BODY, Some("sha1=zz")),
            Err(VerificationError::MalformedSignature)
        );
    }

    #[test]
    fn handshake_requires_subscribe_and_token() {
        assert!(verify_handshake(Some("subscribe"), Some("tok"), "tok").is_ok());
        assert_eq!(
            verify_handshake(Some("subscribe"), Some("nope"), "tok"),
            Err(VerificationError::TokenMismatch)
        );
        assert_eq!(
            verify_handshake(None, Some("tok"), "tok"),
            Err(VerificationError::ModeMismatch(String::new()))
        );
    }
}
