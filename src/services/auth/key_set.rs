use serde::Deserialize;

use crate::services::auth::failure::AuthFailure;

/// One published signing key. Members other than `kid` and `x5c` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishedKey {
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub x5c: Vec<String>,
}

/// The issuer's key-discovery document (`{"keys": [...]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct KeySet {
    pub keys: Vec<PublishedKey>,
}

impl KeySet {
    pub fn from_json(body: &[u8]) -> Result<Self, AuthFailure> {
        let set: KeySet = serde_json::from_slice(body)
            .map_err(|e| AuthFailure::KeyNotFound(format!("key-set document unreadable: {}", e)))?;

        if set.keys.is_empty() {
            return Err(AuthFailure::KeyNotFound("key-set document has no keys".into()));
        }
        Ok(set)
    }

    pub fn contains(&self, kid: &str) -> bool {
        self.keys.iter().any(|k| k.kid.as_deref() == Some(kid))
    }

    /// Certificate body published under exactly `kid`.
    ///
    /// Matching is a strict equality test on each entry's `kid`; entries are
    /// only read, never rewritten.
    pub fn certificate_for(&self, kid: &str) -> Result<&str, AuthFailure> {
        let key = self
            .keys
            .iter()
            .find(|k| k.kid.as_deref() == Some(kid))
            .ok_or_else(|| AuthFailure::KeyNotFound(format!("no published key with kid '{}'", kid)))?;

        match key.x5c.first().map(|c| c.trim()) {
            Some(cert) if !cert.is_empty() => Ok(cert),
            _ => Err(AuthFailure::KeyNotFound(format!(
                "key '{}' carries no certificate",
                kid
            ))),
        }
    }
}
