//! Signing Tests - RSA-PSS Request Authentication
//!
//! Verifies produced signatures against the public half of the fixture
//! key, exactly as the venue would.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rsa::pss::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use sha2::Sha256;

use kalshi_venue_client::adapters::api::auth::signing_message;
use kalshi_venue_client::adapters::api::Credentials;
use kalshi_venue_client::ports::transport::HttpMethod;

const PKCS8: &str = include_str!("fixtures/test_key_pkcs8.pem");
const PKCS1: &str = include_str!("fixtures/test_key_pkcs1.pem");

fn verify(credentials: &Credentials, message: &str, signature_b64: &str) -> bool {
    let verifying_key = VerifyingKey::<Sha256>::new(credentials.public_key());
    let Ok(bytes) = BASE64.decode(signature_b64) else {
        return false;
    };
    let Ok(signature) = Signature::try_from(bytes.as_slice()) else {
        return false;
    };
    verifying_key.verify(message.as_bytes(), &signature).is_ok()
}

#[test]
fn test_same_input_signs_differently_and_both_verify() {
    let creds = Credentials::new("key-id", PKCS8).unwrap();
    let ts = "1700000000000".to_string();
    let path = "/trade-api/v2/portfolio/balance";

    let a = creds.sign_request_at(ts.clone(), HttpMethod::Get, path).unwrap();
    let b = creds.sign_request_at(ts.clone(), HttpMethod::Get, path).unwrap();
    assert_ne!(a.signature, b.signature);

    let message = signing_message(&ts, HttpMethod::Get, path);
    assert!(verify(&creds, &message, &a.signature));
    assert!(verify(&creds, &message, &b.signature));
}

#[test]
fn test_signature_binds_method_path_and_timestamp() {
    let creds = Credentials::new("key-id", PKCS8).unwrap();
    let path = "/trade-api/v2/portfolio/orders/abc";
    let signed = creds
        .sign_request_at("1700000000000".to_string(), HttpMethod::Delete, path)
        .unwrap();

    assert!(verify(&creds, &signing_message("1700000000000", HttpMethod::Delete, path), &signed.signature));
    assert!(!verify(&creds, &signing_message("1700000000000", HttpMethod::Get, path), &signed.signature));
    assert!(!verify(&creds, &signing_message("1700000000001", HttpMethod::Delete, path), &signed.signature));
    assert!(!verify(
        &creds,
        &signing_message("1700000000000", HttpMethod::Delete, "/trade-api/v2/portfolio/orders/abd"),
        &signed.signature
    ));
}

#[test]
fn test_pkcs1_and_pkcs8_keys_interoperate() {
    let from_pkcs8 = Credentials::new("key-id", PKCS8).unwrap();
    let from_pkcs1 = Credentials::new("key-id", PKCS1).unwrap();
    let signed = from_pkcs1
        .sign_request_at("1".to_string(), HttpMethod::Post, "/trade-api/v2/portfolio/orders")
        .unwrap();
    let message = signing_message("1", HttpMethod::Post, "/trade-api/v2/portfolio/orders");
    assert!(verify(&from_pkcs8, &message, &signed.signature));
}

#[test]
fn test_fresh_timestamp_is_unix_millis() {
    let creds = Credentials::new("key-id", PKCS8).unwrap();
    let signed = creds.sign_request(HttpMethod::Get, "/trade-api/v2/portfolio/balance").unwrap();
    let ms: u128 = signed.timestamp.parse().unwrap();
    // After 2020-01-01 and before 2100-01-01.
    assert!(ms > 1_577_836_800_000 && ms < 4_102_444_800_000);
}
