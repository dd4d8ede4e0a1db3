//! Router configuration module
//!
//! Configures all routes, middleware layers, and creates the application router.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::handlers::{
    get_report_handler, health, list_reports_handler, near_reports_handler, ready,
    submit_report_handler,
};
use crate::media_store::MemoryMediaStore;
use crate::openapi::ApiDoc;
use crate::report_store::ReportStore;
use crate::state::AppState;

/// Create the application router with default config and in-memory
/// storage (for testing)
pub fn create_router() -> Router {
    let config = Config::default();
    let state = AppState {
        report_store: Arc::new(ReportStore::in_memory()),
        media_store: Arc::new(MemoryMediaStore::new()),
        max_file_size: config.max_file_size(),
    };
    create_router_with_state(&config, state)
}

/// Create the application router with custom configuration and state
pub fn create_router_with_state(config: &Config, state: AppState) -> Router {
    // Configure CORS based on allowed_origins
    let cors = match &config.allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            tracing::info!("CORS: Restricting to {} origin(s)", origins.len());
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        }
        _ => {
            tracing::warn!("CORS: Allowing all origins (dev mode)");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    // Request body limit
    let body_limit_bytes = config.body_limit_mb * 1024 * 1024;
    let body_limit = RequestBodyLimitLayer::new(body_limit_bytes);

    // Request timeout
    let timeout = TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.timeout_secs),
    );

    // Base router with common layers
    let router = Router::new()
        .route("/reports/new-report", post(submit_report_handler))
        .route("/reports/get-report", get(list_reports_handler))
        .route("/reports/near", get(near_reports_handler))
        .route("/reports/{report_id}", get(get_report_handler))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(body_limit)
        .layer(timeout);

    // Conditionally apply rate limiting (disabled in tests, enabled in production)
    if config.rate_limit_enabled {
        let governor_conf = GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_sec)
            .burst_size(config.rate_limit_burst)
            .finish()
            .expect("Failed to build rate limiter config");

        tracing::info!(
            "Rate limiting: {} req/s (burst: {})",
            config.rate_limit_per_sec,
            config.rate_limit_burst
        );

        router
            .layer(GovernorLayer::new(Arc::new(governor_conf)))
            .layer(TraceLayer::new_for_http())
    } else {
        tracing::warn!("Rate limiting: DISABLED");
        router.layer(TraceLayer::new_for_http())
    }
}
