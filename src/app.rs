/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → Authorizer 生成 → Router 組み立て
 * - Middleware の適用 (request-id / trace / timeout)
 * - axum::serve() で起動
 */
use anyhow::Result;
use axum::{Router, routing::get};
use std::{panic, process};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::{AppEnv, Config};
use crate::error::AppError;
use crate::middleware;
use crate::services::auth::build_authorizer;
use crate::state::AppState;

const DEFAULT_FILTER: &str = "info,todo_authorizer=info,tower_http=info";

// Human-readable lines locally, JSON lines in production.
// RUST_LOG=todo_authorizer=debug shows key-set fetches and rotation refetches.
fn init_tracing(app_env: AppEnv) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    if app_env.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let location = info.location().map(|l| l.to_string());
        tracing::error!(location = location.as_deref().unwrap_or("unknown"), "authorizer panicked");

        // outside production a panic is a bug worth stopping for
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    // APP_ENV picks the log format before the rest of the config is read,
    // so configuration errors are logged in the right shape.
    dotenvy::dotenv().ok();
    init_tracing(AppEnv::parse(std::env::var("APP_ENV").ok().as_deref()));
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        jwks_url = %config.jwks_url,
        cache_ttl_seconds = config.jwks_cache_ttl.as_secs(),
        "starting authorizer in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState, AppError> {
    let authorizer = build_authorizer(config)?;
    Ok(AppState::new(authorizer))
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router)
}
