/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWKS_URL, issuer/audience, fetch timeout など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use jsonwebtoken::Algorithm;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::middleware::http::REQUEST_TIMEOUT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

// RSA families only: the key set publishes RSA certificates.
const ASYMMETRIC_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub jwks_url: Url,
    pub jwks_fetch_timeout: Duration,
    pub jwks_cache_ttl: Duration,

    pub auth_issuer: Option<String>,
    pub auth_audience: Vec<String>,
    pub auth_algorithms: Vec<Algorithm>,
    pub access_token_leeway_seconds: u64,

    pub auth_resource: String,
}

fn list(value: Option<String>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn number<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = number(lookup("PORT"), "PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let jwks_url = lookup("JWKS_URL").ok_or(ConfigError::Missing("JWKS_URL"))?;
        let jwks_url = Url::parse(jwks_url.trim()).map_err(|_| ConfigError::Invalid("JWKS_URL"))?;
        match jwks_url.scheme() {
            "https" => {}
            // plain http only for local development against a mock issuer
            "http" if !app_env.is_production() => {
                tracing::warn!(url = %jwks_url, "JWKS_URL is not https; development only");
            }
            _ => return Err(ConfigError::Invalid("JWKS_URL")),
        }

        let timeout_ms: u64 = number(lookup("JWKS_FETCH_TIMEOUT_MS"), "JWKS_FETCH_TIMEOUT_MS", 3000)?;
        // must finish inside the HTTP request timeout
        if timeout_ms == 0 || Duration::from_millis(timeout_ms) >= REQUEST_TIMEOUT {
            return Err(ConfigError::Invalid("JWKS_FETCH_TIMEOUT_MS"));
        }

        let cache_ttl_seconds: u64 =
            number(lookup("JWKS_CACHE_TTL_SECONDS"), "JWKS_CACHE_TTL_SECONDS", 0)?;

        let auth_issuer = lookup("AUTH_ISSUER")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let auth_audience = list(lookup("AUTH_AUDIENCE"));

        let algorithm_names = list(lookup("AUTH_ALGORITHMS"));
        let auth_algorithms = if algorithm_names.is_empty() {
            vec![Algorithm::RS256]
        } else {
            algorithm_names
                .iter()
                .map(|name| {
                    Algorithm::from_str(name)
                        .ok()
                        .filter(|alg| ASYMMETRIC_ALGORITHMS.contains(alg))
                        .ok_or(ConfigError::Invalid("AUTH_ALGORITHMS"))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let access_token_leeway_seconds = number(
            lookup("ACCESS_TOKEN_LEEWAY_SECONDS"),
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            0,
        )?;

        let auth_resource = lookup("AUTH_RESOURCE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "*".to_string());

        Ok(Self {
            addr,
            app_env,
            jwks_url,
            jwks_fetch_timeout: Duration::from_millis(timeout_ms),
            jwks_cache_ttl: Duration::from_secs(cache_ttl_seconds),
            auth_issuer,
            auth_audience,
            auth_algorithms,
            access_token_leeway_seconds,
            auth_resource,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_jwks_url_is_set() {
        let config = load(&[("JWKS_URL", "https://issuer.example/.well-known/jwks.json")]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.jwks_fetch_timeout, Duration::from_millis(3000));
        assert!(config.jwks_cache_ttl.is_zero());
        assert_eq!(config.auth_algorithms, vec![Algorithm::RS256]);
        assert_eq!(config.auth_issuer, None);
        assert!(config.auth_audience.is_empty());
        assert_eq!(config.access_token_leeway_seconds, 0);
        assert_eq!(config.auth_resource, "*");
    }

    #[test]
    fn jwks_url_is_required() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("JWKS_URL"));
        assert_eq!(
            load(&[("JWKS_URL", "not a url")]).unwrap_err(),
            ConfigError::Invalid("JWKS_URL")
        );
    }

    #[test]
    fn production_requires_https() {
        let err = load(&[
            ("APP_ENV", "production"),
            ("JWKS_URL", "http://issuer.example/jwks.json"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("JWKS_URL"));

        assert!(load(&[("JWKS_URL", "http://127.0.0.1:8080/jwks.json")]).is_ok());
    }

    #[test]
    fn parses_lists_and_numbers() {
        let config = load(&[
            ("JWKS_URL", "https://issuer.example/jwks.json"),
            ("AUTH_ISSUER", "https://issuer.example/"),
            ("AUTH_AUDIENCE", "todo-api, todo-web ,"),
            ("AUTH_ALGORITHMS", "RS256,PS256"),
            ("JWKS_FETCH_TIMEOUT_MS", "2500"),
            ("JWKS_CACHE_TTL_SECONDS", "300"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.auth_issuer.as_deref(), Some("https://issuer.example/"));
        assert_eq!(config.auth_audience, vec!["todo-api", "todo-web"]);
        assert_eq!(config.auth_algorithms, vec![Algorithm::RS256, Algorithm::PS256]);
        assert_eq!(config.jwks_fetch_timeout, Duration::from_millis(2500));
        assert_eq!(config.jwks_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.addr.port(), 8080);
    }

    #[test]
    fn symmetric_or_unknown_algorithms_are_refused() {
        for algs in ["HS256", "none", "RS256,ES256"] {
            let err = load(&[
                ("JWKS_URL", "https://issuer.example/jwks.json"),
                ("AUTH_ALGORITHMS", algs),
            ])
            .unwrap_err();
            assert_eq!(err, ConfigError::Invalid("AUTH_ALGORITHMS"), "algs {algs}");
        }
    }

    #[test]
    fn zero_or_garbage_timeout_is_invalid() {
        for value in ["0", "soon"] {
            let err = load(&[
                ("JWKS_URL", "https://issuer.example/jwks.json"),
                ("JWKS_FETCH_TIMEOUT_MS", value),
            ])
            .unwrap_err();
            assert_eq!(err, ConfigError::Invalid("JWKS_FETCH_TIMEOUT_MS"));
        }
    }

    #[test]
    fn fetch_timeout_must_stay_below_request_timeout() {
        let err = load(&[
            ("JWKS_URL", "https://issuer.example/jwks.json"),
            ("JWKS_FETCH_TIMEOUT_MS", "15000"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("JWKS_FETCH_TIMEOUT_MS"));

        let config = load(&[
            ("JWKS_URL", "https://issuer.example/jwks.json"),
            ("JWKS_FETCH_TIMEOUT_MS", "14999"),
        ])
        .unwrap();
        assert_eq!(config.jwks_fetch_timeout, Duration::from_millis(14_999));
    }
}
