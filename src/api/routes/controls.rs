//! Control Routes
//!
//! User-facing entry points forwarded from the page.
//!
//! - POST /api/refresh - Start a manual refresh
//! - POST /api/theme/toggle - Toggle light/dark
//! - POST /api/info - Show the info overlay
//! - DELETE /api/info - Hide the info overlay
//! - POST /api/keys - Dispatch a keyboard shortcut
//! - POST /api/lifecycle - Visibility and connectivity changes

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{
    InfoResponse, KeyResponse, LifecycleRequest, LifecycleResponse, RefreshResponse,
    ThemeResponse, MAX_VIEW_ID_LEN,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::ui::KeyPress;

/// POST /api/refresh
///
/// Returns 202 once the refresh has started, 409 if one is in flight.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<RefreshResponse>)> {
    if !state.dashboard.controller().try_trigger().await {
        return Err(ApiError::RefreshInProgress);
    }

    tracing::info!("Manual refresh started");
    Ok((
        StatusCode::ACCEPTED,
        Json(RefreshResponse {
            status: "started".to_string(),
        }),
    ))
}

/// POST /api/theme/toggle
pub async fn toggle_theme(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    let theme = state.dashboard.toggle_theme().await;
    Json(ThemeResponse { theme })
}

/// POST /api/info
pub async fn show_info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    state.dashboard.show_info().await;
    Json(InfoResponse { visible: true })
}

/// DELETE /api/info
pub async fn hide_info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    state.dashboard.hide_info().await;
    Json(InfoResponse { visible: false })
}

/// POST /api/keys
pub async fn key_press(
    State(state): State<Arc<AppState>>,
    Json(press): Json<KeyPress>,
) -> ApiResult<Json<KeyResponse>> {
    if press.key.is_empty() {
        return Err(ApiError::Validation("key must not be empty".to_string()));
    }

    let action = state.dashboard.handle_key(&press).await;
    Ok(Json(KeyResponse { action }))
}

/// POST /api/lifecycle
///
/// Events carrying a `view` id are tracked per page, so one hidden tab does
/// not suspend polling for the others.
pub async fn lifecycle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LifecycleRequest>,
) -> ApiResult<(StatusCode, Json<LifecycleResponse>)> {
    let view = request.view.as_deref().filter(|view| !view.is_empty());
    if view.is_some_and(|view| view.len() > MAX_VIEW_ID_LEN) {
        return Err(ApiError::Validation(format!(
            "view must be at most {} bytes",
            MAX_VIEW_ID_LEN
        )));
    }

    state
        .dashboard
        .controller()
        .handle_view_lifecycle(view, request.event)
        .await;

    Ok((
        StatusCode::ACCEPTED,
        Json(LifecycleResponse {
            status: "accepted".to_string(),
            event: request.event,
        }),
    ))
}
