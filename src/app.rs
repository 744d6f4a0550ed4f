/*
 * Responsibility
 * - Config読み込み → 依存生成 (PgPool / ProfileService / AuthService / CorsPolicy) → Router 組み立て
 * - Middleware の適用 (http → security headers → cors, 認証は v1 routes 側)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware::{self, cors::CorsPolicy, http::HttpSettings};
use crate::repos::PgProfileRepo;
use crate::services::{auth::AuthService, profile_service::ProfileService};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,profile_service=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // default hook は fallback として残す (stderr に location/payload)
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: プロセスごと落として気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting profile service in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, config.http);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("failed to connect to postgres")?;

    let profiles = ProfileService::new(Arc::new(PgProfileRepo::new(db)));
    let auth = Arc::new(AuthService::new(
        &config.jwt_secret,
        config.access_token_leeway_seconds,
    ));
    let cors = Arc::new(CorsPolicy::from_config(config));

    tracing::info!(origins = ?config.cors_allowed_origins, "cors policy loaded");

    Ok(AppState::new(profiles, auth, cors))
}

/// Full middleware stack around the v1 API. Outermost first: http → security headers → cors.
pub fn build_router(state: AppState, http: HttpSettings) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()));

    let router = middleware::cors::apply(router, state.clone());
    let router = middleware::security_headers::apply(router);

    middleware::http::apply(router.with_state(state), http)
}
