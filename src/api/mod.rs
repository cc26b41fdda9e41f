//! Dashboard HTTP Server
//!
//! Serves the dashboard page and the control endpoints, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Full dashboard page
//! - `GET /api/state` - JSON snapshot of phase, panels and theme
//!
//! ## Controls
//! - `POST /api/refresh` - Manual refresh (202 started, 409 in flight)
//! - `POST /api/theme/toggle` - Toggle light/dark
//! - `POST /api/info` / `DELETE /api/info` - Show or hide the info overlay
//! - `POST /api/keys` - Keyboard shortcut dispatch
//! - `POST /api/lifecycle` - `hidden`, `visible`, `online`, `offline`, with an optional view id
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Refresh status
//!
//! # Example
//!
//! ```rust,ignore
//! use screener_dashboard::api::{serve, ApiConfig, AppState};
//! use std::sync::Arc;
//!
//! let state = AppState::new(Arc::new(dashboard), ApiConfig::default());
//! serve(state, &ApiConfig::default()).await?;
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/state", get(routes::dashboard::dashboard_state))
        .route("/refresh", post(routes::controls::refresh))
        .route("/theme/toggle", post(routes::controls::toggle_theme))
        .route(
            "/info",
            post(routes::controls::show_info).delete(routes::controls::hide_info),
        )
        .route("/keys", post(routes::controls::key_press))
        .route("/lifecycle", post(routes::controls::lifecycle));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::dashboard::index))
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the server and run until a shutdown signal arrives
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Screener dashboard listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::{sample_document, FakeSource};
    use crate::controller::{RefreshController, RefreshSettings};
    use crate::render::Renderer;
    use crate::ui::{Dashboard, MemoryThemeStore, ThemeController};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::time::Duration;
    use tower::util::ServiceExt;

    async fn create_test_app(source: Arc<FakeSource>) -> (Router, Arc<Dashboard>) {
        create_test_app_with(
            source,
            RefreshSettings {
                animation: Duration::ZERO,
                ..Default::default()
            },
        )
        .await
    }

    async fn create_test_app_with(
        source: Arc<FakeSource>,
        settings: RefreshSettings,
    ) -> (Router, Arc<Dashboard>) {
        let controller = RefreshController::new(source, Renderer::default(), settings);
        let theme = ThemeController::load(Arc::new(MemoryThemeStore::default())).await;
        let dashboard = Arc::new(Dashboard::new(controller, theme));

        let state = AppState::new(Arc::clone(&dashboard), ApiConfig::default());
        (build_router(state), dashboard)
    }

    fn default_source() -> Arc<FakeSource> {
        Arc::new(FakeSource::new(Ok(sample_document(&["AAPL", "MSFT"]))))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _) = create_test_app(default_source()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_phase() {
        let (app, dashboard) = create_test_app(default_source()).await;
        dashboard.controller().refresh().await;

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["phase"]["state"], "displaying");
        assert_eq!(body["phase"]["stocks"], 2);
    }

    #[tokio::test]
    async fn test_index_serves_page() {
        let (app, dashboard) = create_test_app(default_source()).await;
        dashboard.controller().refresh().await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("(AAPL)"));
        assert!(html.contains("(MSFT)"));
    }

    #[tokio::test]
    async fn test_state_snapshot() {
        let (app, _) = create_test_app(default_source()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/state")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["theme"], "light");
        assert_eq!(body["phase"]["state"], "idle");
        assert_eq!(body["display"]["panels"]["loading"], false);
        assert!(body["display"]["version"].is_u64());
    }

    #[tokio::test]
    async fn test_refresh_conflict() {
        let source = Arc::new(
            FakeSource::new(Ok(sample_document(&["AAPL"]))).with_delay(Duration::from_secs(5)),
        );
        let (app, _) = create_test_app(source).await;

        let first = app.clone().oneshot(post("/api/refresh", "")).await.unwrap();
        assert_eq!(first.status(), StatusCode::ACCEPTED);

        let second = app.oneshot(post("/api/refresh", "")).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = body_json(second).await;
        assert_eq!(body["error"]["code"], "REFRESH_IN_PROGRESS");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_theme_toggle() {
        let (app, dashboard) = create_test_app(default_source()).await;

        let response = app
            .oneshot(post("/api/theme/toggle", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["theme"], "dark");
        assert_eq!(dashboard.theme().await, crate::ui::Theme::Dark);
    }

    #[tokio::test]
    async fn test_info_overlay() {
        let (app, dashboard) = create_test_app(default_source()).await;

        let response = app.clone().oneshot(post("/api/info", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(dashboard.info_visible().await);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!dashboard.info_visible().await);
    }

    #[tokio::test]
    async fn test_key_dispatch() {
        let (app, dashboard) = create_test_app(default_source()).await;

        let response = app
            .clone()
            .oneshot(post("/api/keys", r#"{"key": "t", "ctrl": true}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["action"], "toggle_theme");
        assert_eq!(dashboard.theme().await, crate::ui::Theme::Dark);

        let response = app
            .oneshot(post("/api/keys", r#"{"key": "q"}"#))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["action"], Value::Null);
    }

    #[tokio::test]
    async fn test_key_invalid_json() {
        let (app, _) = create_test_app(default_source()).await;

        let response = app.oneshot(post("/api/keys", "not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lifecycle_offline() {
        let (app, dashboard) = create_test_app(default_source()).await;

        let response = app
            .oneshot(post("/api/lifecycle", r#"{"event": "offline"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let frame = dashboard.controller().frame().await;
        assert!(frame.panels.error);
        assert_eq!(frame.error_message, crate::error::OFFLINE_MESSAGE);
    }

    #[tokio::test]
    async fn test_lifecycle_unknown_event() {
        let (app, _) = create_test_app(default_source()).await;

        let response = app
            .oneshot(post("/api/lifecycle", r#"{"event": "asleep"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    fn lifecycle_event(event: &str, view: &str) -> Request<Body> {
        post(
            "/api/lifecycle",
            &format!(r#"{{"event": "{}", "view": "{}"}}"#, event, view),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_survives_reload_and_background_tab() {
        let source = default_source();
        let (app, dashboard) = create_test_app_with(
            source.clone(),
            RefreshSettings {
                interval: Duration::from_secs(60),
                animation: Duration::ZERO,
                ..Default::default()
            },
        )
        .await;
        dashboard.controller().start().await;

        for view in ["tab-a", "tab-b"] {
            let response = app
                .clone()
                .oneshot(lifecycle_event("visible", view))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::ACCEPTED);
        }

        // tab-b goes to the background, tab-a reloads and reports in again
        app.clone()
            .oneshot(lifecycle_event("hidden", "tab-b"))
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        app.clone()
            .oneshot(lifecycle_event("visible", "tab-a"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(600) + Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 11);
        assert!(dashboard.controller().is_polling().await);
    }

    #[tokio::test]
    async fn test_lifecycle_rejects_long_view_id() {
        let (app, _) = create_test_app(default_source()).await;

        let response = app
            .oneshot(lifecycle_event("hidden", &"x".repeat(65)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
