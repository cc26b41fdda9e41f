//! Dashboard Routes
//!
//! - GET / - The dashboard page
//! - GET /api/state - JSON snapshot of the dashboard

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::ui::DashboardState;

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let page = state.dashboard.render_page().await;
    ([(header::CACHE_CONTROL, "no-store")], Html(page))
}

/// GET /api/state
pub async fn dashboard_state(State(state): State<Arc<AppState>>) -> Json<DashboardState> {
    Json(state.dashboard.state().await)
}
