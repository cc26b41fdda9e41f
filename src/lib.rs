//! # Screener Dashboard
//!
//! An auto-refreshing, themed dashboard for pre-computed stock screener
//! results. The screener job writes a JSON snapshot; this crate polls it,
//! renders it into a list of cards and serves the result over HTTP.
//!
//! ## Features
//!
//! - **Polling**: refresh every 15 minutes, suspended while the page is hidden
//! - **Single flight**: at most one fetch in progress at any time
//! - **Fail closed**: malformed documents show an error, never a partial list
//! - **Escaped output**: all document text passes through the view tree
//! - **Themes**: persisted light/dark preference
//!
//! ## Modules
//!
//! - [`format`]: price, volume and date formatting
//! - [`document`]: the screener document and its validation
//! - [`render`]: document to statistics and stock cards
//! - [`fetch`]: time-bounded HTTP and file sources
//! - [`controller`]: the refresh state machine and display state
//! - [`ui`]: theme, shortcuts, info overlay and page assembly
//! - [`api`]: HTTP server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use screener_dashboard::controller::{RefreshController, RefreshSettings};
//! use screener_dashboard::fetch::{source_for, DEFAULT_LOCATION, DEFAULT_TIMEOUT};
//! use screener_dashboard::render::Renderer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = source_for(DEFAULT_LOCATION, None, DEFAULT_TIMEOUT)?;
//!     let controller =
//!         RefreshController::new(source, Renderer::default(), RefreshSettings::default());
//!
//!     let outcome = controller.refresh().await;
//!     println!("{:?}", outcome);
//!
//!     controller.dispose().await;
//!     Ok(())
//! }
//! ```

pub mod animate;
pub mod api;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod fetch;
pub mod format;
pub mod render;
pub mod ui;
pub mod view;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use controller::{LifecycleEvent, Phase, RefreshController, RefreshOutcome, RefreshSettings};

pub use document::{ScreenerDocument, StockEntry};

pub use error::ErrorKind;

pub use fetch::{source_for, DocumentSource, FetchError, FileSource, HttpSource};

pub use format::Formatter;

pub use render::{RenderError, RenderedDashboard, Renderer};

pub use ui::{Dashboard, Theme, ThemeController, ThemeStore};
