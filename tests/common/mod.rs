#![allow(dead_code)]

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use todo_authorizer::services::auth::{Authorizer, AuthorizerConfig, TokenPolicy};

pub const KEY_A: &str = include_str!("../fixtures/key_a.pem");
pub const CERT_A: &str = include_str!("../fixtures/cert_a.pem");
pub const KEY_B: &str = include_str!("../fixtures/key_b.pem");
pub const CERT_B: &str = include_str!("../fixtures/cert_b.pem");

pub const JWKS_PATH: &str = "/.well-known/jwks.json";

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_secs()
}

pub fn x5c_body(pem: &str) -> String {
    pem.lines().filter(|l| !l.starts_with("-----")).collect()
}

pub fn sign(private_key_pem: &str, kid: &str, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).expect("fixture key");
    jsonwebtoken::encode(&header, claims, &key).expect("sign fixture token")
}

pub fn key_set(entries: &[(&str, &str)]) -> Value {
    let keys: Vec<Value> = entries
        .iter()
        .map(|(kid, cert_pem)| {
            json!({ "kty": "RSA", "use": "sig", "alg": "RS256", "kid": kid, "x5c": [x5c_body(cert_pem)] })
        })
        .collect();
    json!({ "keys": keys })
}

/// Mock issuer serving `document`; the server verifies `expected_calls` on drop.
pub async fn issuer(document: Value, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

pub fn config_for(server: &MockServer) -> AuthorizerConfig {
    AuthorizerConfig {
        jwks_url: Url::parse(&format!("{}{}", server.uri(), JWKS_PATH)).expect("mock url"),
        fetch_timeout: Duration::from_secs(2),
        cache_ttl: Duration::ZERO,
        policy: TokenPolicy::default(),
        resource: "*".to_string(),
    }
}

pub fn authorizer_for(server: &MockServer) -> Arc<Authorizer> {
    Arc::new(Authorizer::new(config_for(server)).expect("authorizer"))
}
