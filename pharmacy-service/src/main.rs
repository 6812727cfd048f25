use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

mod api;
mod cache;
mod config;
mod db;
mod error;
mod search;
mod service;
mod validation;

use crate::config::ServiceConfig;
use crate::db::Database;
use crate::service::PharmacyService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!(
        "Starting pharmacy service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = ServiceConfig::load()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    let db_path = config.storage.database_path();
    let db = Arc::new(Database::open(&db_path)?);
    info!(path = %db_path.display(), "Database initialized");

    let cache = cache::from_config(&config.cache).await?;
    info!(backend = ?config.cache.backend, "Record cache configured");

    let service = Arc::new(PharmacyService::new(db, cache, config.search.clone()));
    let app = api::router(service, &config.dev);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pharmacy_service=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}
