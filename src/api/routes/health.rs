//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Refresh status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::controller::Phase;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// Healthy once a document has been displayed, degraded while the last
/// refresh failed.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.dashboard.controller().snapshot().await;

    let status = match snapshot.phase {
        Phase::Displaying { .. } => "healthy",
        Phase::Failed { .. } => "degraded",
        Phase::Idle | Phase::Fetching => "starting",
    };

    Json(HealthResponse {
        status: status.to_string(),
        phase: snapshot.phase,
        polling: snapshot.polling,
        source: snapshot.source,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
