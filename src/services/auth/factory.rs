/// Factory: build the `Authorizer` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{Authorizer, AuthorizerConfig, TokenPolicy};

pub fn authorizer_config(config: &Config) -> AuthorizerConfig {
    AuthorizerConfig {
        jwks_url: config.jwks_url.clone(),
        fetch_timeout: config.jwks_fetch_timeout,
        cache_ttl: config.jwks_cache_ttl,
        policy: TokenPolicy {
            algorithms: config.auth_algorithms.clone(),
            issuer: config.auth_issuer.clone(),
            audience: config.auth_audience.clone(),
            leeway_seconds: config.access_token_leeway_seconds,
        },
        resource: config.auth_resource.clone(),
    }
}

pub fn build_authorizer(config: &Config) -> Result<Arc<Authorizer>, AppError> {
    let authorizer = Authorizer::new(authorizer_config(config)).map_err(|e| {
        tracing::error!(error = %e, "failed to build key-set http client");
        AppError::Internal
    })?;

    Ok(Arc::new(authorizer))
}
