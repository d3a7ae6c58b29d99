//! Fixture keys and token minting for unit tests.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};

pub const KEY_A: &str = include_str!("../../../tests/fixtures/key_a.pem");
pub const CERT_A: &str = include_str!("../../../tests/fixtures/cert_a.pem");
pub const KEY_B: &str = include_str!("../../../tests/fixtures/key_b.pem");
pub const CERT_B: &str = include_str!("../../../tests/fixtures/cert_b.pem");

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_secs()
}

pub fn future() -> u64 {
    now() + 3600
}

pub fn claims(sub: &str, exp: u64) -> Value {
    json!({ "sub": sub, "exp": exp, "iat": now() })
}

/// PEM certificate file -> the bare body a key-set document would carry.
pub fn x5c_body(pem: &str) -> String {
    pem.lines()
        .filter(|l| !l.starts_with("-----"))
        .collect::<String>()
}

pub fn sign(private_key_pem: &str, kid: &str, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).expect("fixture key");
    jsonwebtoken::encode(&header, claims, &key).expect("sign fixture token")
}
