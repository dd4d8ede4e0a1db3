//! Health check handlers
//!
//! Provides health and readiness endpoints for monitoring and orchestration.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status: "healthy" or "degraded"
    #[schema(example = "healthy")]
    pub status: &'static str,
    /// Server version from Cargo.toml
    pub version: &'static str,
    /// Whether the report store survives restarts (PostgreSQL backend)
    pub store_persistent: bool,
    /// Service name
    pub service: &'static str,
}

/// GET /health - Health check endpoint
///
/// Returns JSON with service status, version, and report-store backend
/// information. Used for monitoring and load balancer health checks.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = state.report_store.check_health().await.is_ok();

    let status = if store_healthy { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store_persistent: state.report_store.is_persistent(),
        service: "noisewatch-server",
    })
}

/// Readiness response for Kubernetes
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether the service is ready to accept traffic
    pub ready: bool,
    /// Optional message explaining status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// GET /ready - Kubernetes readiness probe
///
/// Returns 200 if the service is ready to accept traffic.
/// Unlike /health, this is a simple yes/no check.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service readiness", body = ReadyResponse)
    )
)]
pub async fn ready() -> Json<ReadyResponse> {
    Json(ReadyResponse {
        ready: true,
        message: None,
    })
}
