use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use std::str::FromStr;

use crate::services::auth::failure::AuthFailure;

/// JOSE header as declared by the token. Nothing here is trusted.
#[derive(Debug, Clone, Deserialize)]
pub struct DeclaredHeader {
    pub alg: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub typ: Option<String>,
}

/// A token that has been split and had its header decoded, but whose
/// signature has not been checked.
#[derive(Debug)]
pub struct UnverifiedToken<'a> {
    raw: &'a str,
    header: DeclaredHeader,
}

impl<'a> UnverifiedToken<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, AuthFailure> {
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(AuthFailure::MalformedToken(format!(
                "expected 3 non-empty segments, got {}",
                segments.len()
            )));
        }

        let header_bytes = URL_SAFE_NO_PAD
            .decode(segments[0])
            .map_err(|e| AuthFailure::MalformedToken(format!("header is not base64url: {}", e)))?;

        let header: DeclaredHeader = serde_json::from_slice(&header_bytes)
            .map_err(|e| AuthFailure::MalformedToken(format!("header is not a JOSE object: {}", e)))?;

        Ok(Self { raw, header })
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn header(&self) -> &DeclaredHeader {
        &self.header
    }

    /// Declared `alg`, provided it is one of `accepted`.
    ///
    /// `none` and anything outside the accepted list are refused here, before
    /// a key is even looked up.
    pub fn algorithm(&self, accepted: &[Algorithm]) -> Result<Algorithm, AuthFailure> {
        let alg = Algorithm::from_str(&self.header.alg).map_err(|_| {
            AuthFailure::SignatureInvalid(format!("algorithm '{}' not accepted", self.header.alg))
        })?;

        if !accepted.contains(&alg) {
            return Err(AuthFailure::SignatureInvalid(format!(
                "algorithm '{}' not accepted",
                self.header.alg
            )));
        }
        Ok(alg)
    }

    pub fn kid(&self) -> Result<&str, AuthFailure> {
        match self.header.kid.as_deref() {
            Some(kid) if !kid.is_empty() => Ok(kid),
            _ => Err(AuthFailure::KeyNotFound("token header has no 'kid'".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    fn token_with_header(json: &str) -> String {
        format!("{}.{}.sig", segment(json), segment(r#"{"sub":"x"}"#))
    }

    #[test]
    fn recovers_kid_and_alg() {
        let raw = token_with_header(r#"{"alg":"RS256","typ":"JWT","kid":"abc"}"#);
        let token = UnverifiedToken::parse(&raw).unwrap();
        assert_eq!(token.kid().unwrap(), "abc");
        assert_eq!(token.algorithm(&[Algorithm::RS256]).unwrap(), Algorithm::RS256);
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        for raw in ["abc", "a.b", "a.b.c.d", "a..c"] {
            assert!(matches!(
                UnverifiedToken::parse(raw),
                Err(AuthFailure::MalformedToken(_))
            ));
        }
    }

    #[test]
    fn garbage_header_is_malformed() {
        assert!(matches!(
            UnverifiedToken::parse("!!!.e30.sig"),
            Err(AuthFailure::MalformedToken(_))
        ));
        let not_json = format!("{}.e30.sig", segment("not json"));
        assert!(matches!(
            UnverifiedToken::parse(&not_json),
            Err(AuthFailure::MalformedToken(_))
        ));
    }

    #[test]
    fn none_and_symmetric_algorithms_are_refused() {
        for alg in ["none", "HS256", "ES256"] {
            let raw = token_with_header(&format!(r#"{{"alg":"{alg}","kid":"abc"}}"#));
            let token = UnverifiedToken::parse(&raw).unwrap();
            assert!(
                matches!(
                    token.algorithm(&[Algorithm::RS256]),
                    Err(AuthFailure::SignatureInvalid(_))
                ),
                "alg {alg} should be refused"
            );
        }
    }

    #[test]
    fn missing_kid_is_key_not_found() {
        let raw = token_with_header(r#"{"alg":"RS256"}"#);
        let token = UnverifiedToken::parse(&raw).unwrap();
        assert!(matches!(token.kid(), Err(AuthFailure::KeyNotFound(_))));
    }
}
