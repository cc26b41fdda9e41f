//! Screener Dashboard Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Read from the first of:
//! - `~/.config/screener-dashboard/config.toml`
//! - `/etc/screener-dashboard/config.toml`
//! - `./config.toml`
//!
//! `RUST_LOG` overrides the configured log level.

use anyhow::Context;
use screener_dashboard::api::{serve, AppState};
use screener_dashboard::config::{Config, LoggingConfig};
use screener_dashboard::controller::RefreshController;
use screener_dashboard::fetch::{source_for, DocumentSource};
use screener_dashboard::render::Renderer;
use screener_dashboard::ui::{Dashboard, FileThemeStore, ThemeController};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = Config::load_default();
    init_tracing(&loaded.config.logging);

    tracing::info!(
        "Starting Screener Dashboard v{}",
        env!("CARGO_PKG_VERSION")
    );
    loaded.report();
    if loaded.path.is_none() && loaded.errors.is_empty() {
        write_config_template();
    }
    let config = loaded.config;

    let source = source_for(
        &config.source.location,
        config.source.http_base.as_deref(),
        config.source.timeout(),
    )
    .context("Failed to create document source")?;
    tracing::info!(location = %source.location(), "Document source ready");

    let renderer = Renderer::new(config.display.formatter());
    let controller = RefreshController::new(source, renderer, config.refresh.settings());

    let theme_store = Arc::new(FileThemeStore::new(&config.theme.store_path));
    let theme = ThemeController::load(theme_store).await;
    let dashboard = Arc::new(Dashboard::new(controller.clone(), theme));

    // Initial load runs in the background so the page is served immediately
    let initial = controller.clone();
    tokio::spawn(async move {
        let outcome = initial.start().await;
        tracing::debug!(?outcome, "Initial refresh finished");
    });

    let api_config = config.server.api_config();
    let state = AppState::new(dashboard, api_config.clone());
    let result = serve(state, &api_config).await;

    controller.dispose().await;
    result.context("Server failed")?;

    tracing::info!("Screener Dashboard shutdown complete");
    Ok(())
}

/// Leave a commented config in the first search location for the next run
fn write_config_template() {
    let Some(path) = Config::default_paths().into_iter().next() else {
        return;
    };
    match Config::write_default(&path) {
        Ok(true) => tracing::info!("Wrote default config to {:?}", path),
        Ok(false) => {}
        Err(e) => tracing::warn!("Could not write default config: {}", e),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "screener_dashboard={level},tower_http={level}",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
