//! # Rusty-Blog Binary
//!
//! The entry point that assembles the application based on compile-time features.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use configs::{AppConfig, LogFormat};
use services::{BlogEngine, Stores};
use tracing_subscriber::EnvFilter;

#[cfg(not(feature = "web-axum"))]
compile_error!("the binary needs the `web-axum` feature");

#[cfg(not(any(feature = "db-sqlite", feature = "db-memory")))]
compile_error!("enable one store feature: `db-sqlite` or `db-memory`");

#[cfg(feature = "db-sqlite")]
async fn build_stores(config: &AppConfig) -> anyhow::Result<Stores> {
    let store = storage_adapters::SqliteStore::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open {}", config.database_url))?;
    Ok(Stores::from_store(Arc::new(store)))
}

#[cfg(all(feature = "db-memory", not(feature = "db-sqlite")))]
async fn build_stores(_config: &AppConfig) -> anyhow::Result<Stores> {
    tracing::warn!("using the in-memory store; data is lost on exit");
    Ok(Stores::from_store(Arc::new(storage_adapters::MemoryStore::new())))
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(config.log_format);
    tracing::debug!(?config, "configuration loaded");

    // 1. Initialize the store selected at compile time
    let stores = build_stores(&config).await?;

    // 2. Wire the engine; seeds the anonymous identity
    let engine = BlogEngine::bootstrap(stores)
        .await
        .context("failed to seed the anonymous identity")?;

    // 3. Serve
    let app = router(AppState { engine });
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("Rusty-Blog starting on http://{}", config.bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
