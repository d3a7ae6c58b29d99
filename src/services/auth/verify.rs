use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::services::auth::failure::{AuthFailure, ClaimIssue};
use crate::services::auth::token::UnverifiedToken;

/// What a token must satisfy besides a good signature.
#[derive(Debug, Clone)]
pub struct TokenPolicy {
    pub algorithms: Vec<Algorithm>,
    pub issuer: Option<String>,
    pub audience: Vec<String>,
    pub leeway_seconds: u64,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            algorithms: vec![Algorithm::RS256],
            issuer: None,
            audience: Vec::new(),
            leeway_seconds: 0,
        }
    }
}

impl TokenPolicy {
    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.algorithms = self.algorithms.clone();
        validation.leeway = self.leeway_seconds;
        validation.validate_nbf = true;

        let mut required = vec!["exp", "sub"];
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        if self.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&self.audience);
            required.push("aud");
        }
        validation.set_required_spec_claims(&required);

        validation
    }
}

/// Claims of a token whose signature and time bounds have been checked.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedClaims {
    #[serde(default)]
    pub sub: String,
    // 0 only when absent; required-claim validation rejects that first
    #[serde(default)]
    pub exp: u64,
    #[serde(default)]
    pub iat: Option<u64>,
    #[serde(default)]
    pub nbf: Option<u64>,
    #[serde(default)]
    pub iss: Option<String>,
    // string or array of strings
    #[serde(default)]
    pub aud: serde_json::Value,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Check the signature against `certificate_pem`, then the claims against
/// `policy`.
///
/// The certificate decides; whatever `kid` the token claimed only chose
/// which certificate to try.
pub fn verify_token(
    token: &UnverifiedToken<'_>,
    certificate_pem: &str,
    policy: &TokenPolicy,
) -> Result<VerifiedClaims, AuthFailure> {
    let alg = token.algorithm(&policy.algorithms)?;

    let key = DecodingKey::from_rsa_pem(certificate_pem.as_bytes()).map_err(|e| {
        AuthFailure::KeyNotFound(format!("certificate material unusable: {}", e))
    })?;

    let data = jsonwebtoken::decode::<VerifiedClaims>(token.raw(), &key, &policy.validation(alg))?;
    let claims = data.claims;

    if claims.sub.trim().is_empty() {
        return Err(ClaimIssue::MissingClaim("sub".into()).into());
    }
    if claims.exp == 0 {
        return Err(ClaimIssue::MissingClaim("exp".into()).into());
    }

    Ok(claims)
}
