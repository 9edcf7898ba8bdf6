//! Venue Authentication - RSA-PSS Request Signing
//!
//! Signs every authenticated request with RSA-PSS over SHA-256 (salt
//! length = digest length), base64-encoded. The signing message is
//! `timestamp + METHOD + path` with no separators; the path is the route
//! only, never the query string. Credentials come from environment
//! variables (KALSHI_API_KEY, KALSHI_PRIVATE_KEY / KALSHI_PRIVATE_KEY_PATH).

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::pss::BlindedSigningKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use sha2::Sha256;

use crate::error::{CredentialError, Result, VenueError};
use crate::ports::transport::HttpMethod;

/// Header carrying the API key id.
pub const ACCESS_KEY_HEADER: &str = "KALSHI-ACCESS-KEY";
/// Header carrying the base64 signature.
pub const ACCESS_SIGNATURE_HEADER: &str = "KALSHI-ACCESS-SIGNATURE";
/// Header carrying the millisecond timestamp that was signed.
pub const ACCESS_TIMESTAMP_HEADER: &str = "KALSHI-ACCESS-TIMESTAMP";

type KeyDecoder = fn(&str) -> std::result::Result<RsaPrivateKey, String>;

/// Key decoding strategies, tried in order. First success wins.
const KEY_DECODERS: &[(&str, KeyDecoder)] = &[
    ("pkcs8-pem", decode_pkcs8_pem),
    ("pkcs1-pem", decode_pkcs1_pem),
    ("escaped-pem", decode_escaped_pem),
    ("pkcs8-der-base64", decode_pkcs8_der_base64),
    ("pkcs1-der-base64", decode_pkcs1_der_base64),
];

fn decode_pkcs8_pem(material: &str) -> std::result::Result<RsaPrivateKey, String> {
    RsaPrivateKey::from_pkcs8_pem(material.trim()).map_err(|e| e.to_string())
}

fn decode_pkcs1_pem(material: &str) -> std::result::Result<RsaPrivateKey, String> {
    RsaPrivateKey::from_pkcs1_pem(material.trim()).map_err(|e| e.to_string())
}

/// PEM pasted into a `.env` file with literal `\n` sequences.
fn decode_escaped_pem(material: &str) -> std::result::Result<RsaPrivateKey, String> {
    if !material.contains("\\n") {
        return Err("no escaped newlines".to_string());
    }
    let unescaped = material.replace("\\n", "\n");
    decode_pkcs8_pem(&unescaped).or_else(|_| decode_pkcs1_pem(&unescaped))
}

fn decode_der_base64(material: &str) -> std::result::Result<Vec<u8>, String> {
    let compact: String = material.split_whitespace().collect();
    BASE64.decode(compact).map_err(|e| e.to_string())
}

fn decode_pkcs8_der_base64(material: &str) -> std::result::Result<RsaPrivateKey, String> {
    RsaPrivateKey::from_pkcs8_der(&decode_der_base64(material)?).map_err(|e| e.to_string())
}

fn decode_pkcs1_der_base64(material: &str) -> std::result::Result<RsaPrivateKey, String> {
    RsaPrivateKey::from_pkcs1_der(&decode_der_base64(material)?).map_err(|e| e.to_string())
}

/// Decode RSA key material using the first strategy that accepts it.
///
/// # Errors
/// A single `CredentialError::InvalidKey` naming every strategy tried
/// when none of them succeeds (including non-RSA keys).
pub fn decode_private_key(material: &str) -> std::result::Result<RsaPrivateKey, CredentialError> {
    let mut last_reason = String::from("empty key material");
    if !material.trim().is_empty() {
        for (_, decode) in KEY_DECODERS {
            match decode(material) {
                Ok(key) => return Ok(key),
                Err(reason) => last_reason = reason,
            }
        }
    }
    Err(CredentialError::InvalidKey {
        tried: KEY_DECODERS
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", "),
        reason: last_reason,
    })
}

/// Signing message: `timestamp + METHOD + path`, no separators.
pub fn signing_message(timestamp_ms: &str, method: HttpMethod, path: &str) -> String {
    format!("{timestamp_ms}{}{path}", method.as_str())
}

/// RSA-PSS (SHA-256, salt = digest length) signature of `message`, base64.
///
/// PSS salts are random, so two signatures of one message differ while
/// both verify.
pub fn sign(private_key: &RsaPrivateKey, message: &str) -> Result<String> {
    let signing_key = BlindedSigningKey::<Sha256>::new(private_key.clone());
    let signature = signing_key
        .try_sign_with_rng(&mut rand::thread_rng(), message.as_bytes())
        .map_err(|e| VenueError::Signing(e.to_string()))?;
    Ok(BASE64.encode(signature.to_bytes()))
}

/// Current wall-clock time in Unix milliseconds, as sent to the venue.
pub fn timestamp_ms() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .to_string()
}

/// Authentication material for one request. Recomputed per call, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub timestamp: String,
    pub signature: String,
}

/// Venue API credentials. Immutable for the process lifetime.
#[derive(Clone)]
pub struct Credentials {
    /// API key id (sent in clear in `KALSHI-ACCESS-KEY`).
    key_id: String,
    /// RSA private key (never logged, never persisted).
    private_key: RsaPrivateKey,
}

impl Credentials {
    /// Build credentials from a key id and key material.
    pub fn new(key_id: impl Into<String>, key_material: &str) -> std::result::Result<Self, CredentialError> {
        let key_id = key_id.into();
        if key_id.trim().is_empty() {
            return Err(CredentialError::Missing("KALSHI_API_KEY"));
        }
        Ok(Self {
            key_id,
            private_key: decode_private_key(key_material)?,
        })
    }

    /// Load credentials from environment variables.
    ///
    /// Required: KALSHI_API_KEY, plus KALSHI_PRIVATE_KEY (inline) or
    /// KALSHI_PRIVATE_KEY_PATH (PEM file). Inline material wins.
    pub fn from_env() -> std::result::Result<Self, CredentialError> {
        let key_id = std::env::var("KALSHI_API_KEY")
            .map_err(|_| CredentialError::Missing("KALSHI_API_KEY"))?;

        let material = match std::env::var("KALSHI_PRIVATE_KEY") {
            Ok(inline) if !inline.trim().is_empty() => inline,
            _ => {
                let path = std::env::var("KALSHI_PRIVATE_KEY_PATH")
                    .map_err(|_| CredentialError::Missing("KALSHI_PRIVATE_KEY"))?;
                std::fs::read_to_string(&path).map_err(|e| CredentialError::InvalidKey {
                    tried: "file".to_string(),
                    reason: format!("{path}: {e}"),
                })?
            }
        };

        Self::new(key_id, &material)
    }

    /// Get the API key id for request headers.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Public half of the key, for signature verification.
    pub fn public_key(&self) -> rsa::RsaPublicKey {
        self.private_key.to_public_key()
    }

    /// Sign `method` + `path` at an explicit timestamp.
    pub fn sign_request_at(&self, timestamp: String, method: HttpMethod, path: &str) -> Result<SignedRequest> {
        let signature = sign(&self.private_key, &signing_message(&timestamp, method, path))?;
        Ok(SignedRequest {
            method,
            path: path.to_string(),
            timestamp,
            signature,
        })
    }

    /// Sign `method` + `path` at the current wall-clock time.
    pub fn sign_request(&self, method: HttpMethod, path: &str) -> Result<SignedRequest> {
        self.sign_request_at(timestamp_ms(), method, path)
    }

    /// The three access headers for a signed request.
    pub fn auth_headers(&self, signed: &SignedRequest) -> [(&'static str, String); 3] {
        [
            (ACCESS_KEY_HEADER, self.key_id.clone()),
            (ACCESS_SIGNATURE_HEADER, signed.signature.clone()),
            (ACCESS_TIMESTAMP_HEADER, signed.timestamp.clone()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &"[REDACTED]")
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKCS8: &str = include_str!("../../../tests/fixtures/test_key_pkcs8.pem");
    const PKCS1: &str = include_str!("../../../tests/fixtures/test_key_pkcs1.pem");
    const EC_PKCS8: &str = include_str!("../../../tests/fixtures/ec_key_pkcs8.pem");

    #[test]
    fn test_signing_message_has_no_separators() {
        assert_eq!(
            signing_message("1700000000000", HttpMethod::Get, "/trade-api/v2/portfolio/balance"),
            "1700000000000GET/trade-api/v2/portfolio/balance"
        );
    }

    #[test]
    fn test_decodes_pkcs8_and_pkcs1_to_same_key() {
        let a = decode_private_key(PKCS8).unwrap();
        let b = decode_private_key(PKCS1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decodes_escaped_newlines() {
        let escaped = PKCS8.trim().replace('\n', "\\n");
        assert!(decode_private_key(&escaped).is_ok());
    }

    #[test]
    fn test_decodes_bare_base64_der() {
        let body: String = PKCS8
            .lines()
            .filter(|l| !l.starts_with("-----"))
            .collect();
        assert!(decode_private_key(&body).is_ok());
    }

    #[test]
    fn test_rejects_non_rsa_key() {
        let err = decode_private_key(EC_PKCS8).unwrap_err();
        assert!(matches!(err, CredentialError::InvalidKey { .. }));
    }

    #[test]
    fn test_rejects_garbage_with_single_error() {
        let err = decode_private_key("not a key").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("pkcs8-pem"));
        assert!(msg.contains("pkcs1-der-base64"));
    }

    #[test]
    fn test_empty_key_id_is_missing() {
        assert!(matches!(
            Credentials::new("  ", PKCS8),
            Err(CredentialError::Missing("KALSHI_API_KEY"))
        ));
    }

    #[test]
    fn test_credentials_debug_redacts() {
        let creds = Credentials::new("key-id-123", PKCS8).unwrap();
        let debug_str = format!("{creds:?}");
        assert!(!debug_str.contains("key-id-123"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_auth_headers_carry_signed_timestamp() {
        let creds = Credentials::new("key-id-123", PKCS8).unwrap();
        let signed = creds
            .sign_request_at("1700000000000".to_string(), HttpMethod::Delete, "/trade-api/v2/portfolio/orders/x")
            .unwrap();
        let headers = creds.auth_headers(&signed);
        assert_eq!(headers[0], (ACCESS_KEY_HEADER, "key-id-123".to_string()));
        assert_eq!(headers[2], (ACCESS_TIMESTAMP_HEADER, "1700000000000".to_string()));
        assert_eq!(BASE64.decode(&headers[1].1).unwrap().len(), 256);
    }
}
