//! Noisewatch Server - REST API for noise-complaint reports
//!
//! Binary entrypoint: loads configuration, connects the report and media
//! stores from the environment, and serves the API.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use noisewatch_server::{create_router_with_state, media_store, AppState, Config, ReportStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let report_store = match ReportStore::from_env(&config).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize report store");
            std::process::exit(1);
        }
    };

    let media_store = media_store::from_env();

    let state = AppState {
        report_store,
        media_store,
        max_file_size: config.max_file_size(),
    };

    let app = create_router_with_state(&config, state);

    let addr = config.socket_addr();
    tracing::info!(%addr, "Noisewatch server listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
