//! Health check controller.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Readiness response with one entry per probe.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    /// Overall status: `ready` or `not_ready`.
    pub status: String,
    /// Probe name to `healthy`, `degraded` or `unhealthy`.
    pub checks: BTreeMap<String, String>,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/health/live", get(liveness_check))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks = BTreeMap::new();
    let mut ready = true;

    for check in &state.health_checks {
        let status = check.check().await;
        if status.is_unhealthy() {
            warn!("Readiness probe '{}' failed: {:?}", check.name(), status);
            ready = false;
        }
        checks.insert(check.name().to_string(), status.label().to_string());
    }

    let (code, status) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        code,
        Json(ReadinessResponse {
            status: status.to_string(),
            checks,
        }),
    )
}

/// Liveness check endpoint.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
