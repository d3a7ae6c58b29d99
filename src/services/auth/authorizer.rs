use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::services::auth::bearer::{extract_bearer, log_prefix};
use crate::services::auth::cache::CachedKeySetProvider;
use crate::services::auth::certificate;
use crate::services::auth::decision::Decision;
use crate::services::auth::failure::AuthFailure;
use crate::services::auth::provider::{HttpKeySetProvider, KeySetProvider};
use crate::services::auth::token::UnverifiedToken;
use crate::services::auth::verify::{TokenPolicy, VerifiedClaims, verify_token};

/// Everything the authorizer needs to know, handed in explicitly.
#[derive(Debug, Clone)]
pub struct AuthorizerConfig {
    pub jwks_url: Url,
    pub fetch_timeout: Duration,
    // Zero disables caching: one key-set fetch per authorization.
    pub cache_ttl: Duration,
    pub policy: TokenPolicy,
    pub resource: String,
}

/// Bearer-token authorizer.
///
/// extract -> decode (unverified) -> resolve key -> verify signature ->
/// validate claims -> decide
#[derive(Clone)]
pub struct Authorizer {
    provider: Arc<dyn KeySetProvider>,
    policy: TokenPolicy,
    resource: String,
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("key_source", &self.provider.source())
            .field("policy", &self.policy)
            .field("resource", &self.resource)
            .finish()
    }
}

impl Authorizer {
    pub fn new(config: AuthorizerConfig) -> Result<Self, reqwest::Error> {
        let http: Arc<dyn KeySetProvider> =
            Arc::new(HttpKeySetProvider::new(config.jwks_url, config.fetch_timeout)?);

        let provider: Arc<dyn KeySetProvider> = if config.cache_ttl.is_zero() {
            http
        } else {
            Arc::new(CachedKeySetProvider::new(http, config.cache_ttl))
        };

        Ok(Self::with_provider(provider, config.policy, config.resource))
    }

    pub fn with_provider(
        provider: Arc<dyn KeySetProvider>,
        policy: TokenPolicy,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            policy,
            resource: resource.into(),
        }
    }

    /// Decide on a raw `Authorization` header value. Never fails.
    ///
    /// DESIGN DECISION: every failure yields the same Deny. The failure kind
    /// and step go to the log only. Do not surface them in the Decision or in
    /// any response built from it; differentiated denials let an attacker learn
    /// which stage their token got past.
    pub async fn authorize(&self, header: &str) -> Decision {
        match self.verify(header).await {
            Ok(claims) => {
                tracing::info!(principal = %claims.sub, "request authorized");
                Decision::allow(claims.sub, self.resource.clone())
            }
            Err(failure) => {
                tracing::warn!(
                    kind = failure.kind(),
                    step = failure.step(),
                    token_prefix = log_prefix(header),
                    error = %failure,
                    "request denied"
                );
                Decision::deny(self.resource.clone())
            }
        }
    }

    /// The verification pipeline with the failure kept, for callers that
    /// log or test against it.
    pub async fn verify(&self, header: &str) -> Result<VerifiedClaims, AuthFailure> {
        let raw = extract_bearer(header)?;
        let token = UnverifiedToken::parse(raw)?;
        token.algorithm(&self.policy.algorithms)?;
        let kid = token.kid()?;

        let keys = self.provider.fetch_for(kid).await?;
        let pem = certificate::to_pem(keys.certificate_for(kid)?);

        verify_token(&token, &pem, &self.policy)
    }
}
