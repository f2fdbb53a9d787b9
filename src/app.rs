/*
 * Responsibility
 * - Config 読み込み → store 接続 → スキーマ同期 + 初回 seed → Router 組み立て
 * - Middleware (パイプライン) の適用
 * - Ready になってから axum::serve() で起動 (失敗したら listen しない)
 */
use std::{future::Future, panic, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{Router, extract::DefaultBodyLimit, http::StatusCode};
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::{Config, StoreUrl},
    middleware,
    repos::{MemoryStore, PgStore, Store},
    seed::DefaultData,
    services::lifecycle::{Lifecycle, SeedOutcome, StartupError},
    state::AppState,
};

/// Larger JSON bodies fail extraction and surface as a normalized 500.
const JSON_BODY_LIMIT: usize = 100 * 1024;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,storefront_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    // The hook runs before unwinding. It must return so that CatchPanicLayer can still
    // answer the request with a 500.
    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost".
        tracing::error!(?info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook();

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = bootstrap(&config).await?;
    let app = build_router(state, &config);

    // Bind only after the store is Ready.
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("server is running on port {}", config.addr.port());
    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect(config: &Config) -> Result<Arc<dyn Store>, StartupError> {
    let store: Arc<dyn Store> = match &config.database_url {
        StoreUrl::Memory => Arc::new(MemoryStore::new()),
        StoreUrl::Postgres(url) => Arc::new(
            PgStore::connect(url, config.database_max_connections)
                .await
                .map_err(StartupError::Connect)?,
        ),
    };
    Ok(store)
}

/// Connect, sync the schema and seed once, bounded by the startup timeout.
async fn bootstrap(config: &Config) -> Result<AppState, StartupError> {
    let data = Arc::new(DefaultData::load()?);
    prepare(connect(config), data, config.startup_timeout).await
}

async fn prepare<C>(
    connect: C,
    data: Arc<DefaultData>,
    timeout: Duration,
) -> Result<AppState, StartupError>
where
    C: Future<Output = Result<Arc<dyn Store>, StartupError>>,
{
    let work = async {
        let store = connect.await?;
        let outcome = Lifecycle::new(store.as_ref(), &data).run().await?;
        Ok::<_, StartupError>((store, outcome))
    };

    let (store, outcome) = tokio::time::timeout(timeout, work)
        .await
        .map_err(|_| StartupError::Timeout(timeout))??;

    if let SeedOutcome::Seeded(counts) = outcome {
        tracing::debug!(?counts, "seeded");
    }
    tracing::info!(backend = store.backend_name(), "store ready");

    Ok(AppState::new(store, data))
}

// Unmatched paths still pass through the pipeline (so preflights anywhere are gated).
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest(
            "/api",
            api::routes().layer(DefaultBodyLimit::max(JSON_BODY_LIMIT)),
        )
        .nest_service("/images", ServeDir::new(&config.images_dir))
        .fallback(not_found)
        .with_state(state);

    middleware::apply(router, config)
}
