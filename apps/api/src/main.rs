mod analysis;
mod config;
mod db;
mod errors;
mod gateway;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::gateway::ModelGateway;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgAnalysisStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars; the
    // pipeline must never start with a partial credential set)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL-backed analysis store
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgAnalysisStore::new(db));

    // Initialize the model gateway with all configured backends
    let gateway = Arc::new(ModelGateway::from_config(&config));
    info!(
        "Model gateway initialized ({} backends)",
        gateway.backends().len()
    );

    // Build app state
    let state = AppState { store, gateway };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
