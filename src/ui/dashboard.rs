//! Dashboard Shell
//!
//! Ties the refresh controller to the theme preference and the info
//! overlay, and dispatches keyboard shortcuts to them.

use serde::Serialize;
use tokio::sync::RwLock;

use super::keyboard::{resolve, KeyPress, ShortcutAction};
use super::page::{render_page, PageContext};
use super::theme::{Theme, ThemeController};
use crate::controller::{ControllerSnapshot, RefreshController};

/// JSON view of the whole dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub theme: Theme,
    pub info_visible: bool,
    #[serde(flatten)]
    pub controller: ControllerSnapshot,
}

pub struct Dashboard {
    controller: RefreshController,
    theme: ThemeController,
    info_visible: RwLock<bool>,
}

impl Dashboard {
    pub fn new(controller: RefreshController, theme: ThemeController) -> Self {
        Self {
            controller,
            theme,
            info_visible: RwLock::new(false),
        }
    }

    pub fn controller(&self) -> &RefreshController {
        &self.controller
    }

    /// Toggle and persist the theme. A failed save is logged and the new
    /// theme stays applied for this process.
    pub async fn toggle_theme(&self) -> Theme {
        match self.theme.toggle().await {
            Ok(theme) => {
                tracing::info!(theme = theme.as_str(), "Theme changed");
                theme
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save theme preference");
                self.theme.current().await
            }
        }
    }

    pub async fn theme(&self) -> Theme {
        self.theme.current().await
    }

    pub async fn show_info(&self) {
        *self.info_visible.write().await = true;
    }

    pub async fn hide_info(&self) {
        *self.info_visible.write().await = false;
    }

    pub async fn info_visible(&self) -> bool {
        *self.info_visible.read().await
    }

    /// Resolve and dispatch a shortcut. Refreshes are started, not awaited.
    pub async fn handle_key(&self, press: &KeyPress) -> Option<ShortcutAction> {
        let action = resolve(press)?;
        tracing::debug!(?action, key = %press.key, "Shortcut");

        match action {
            ShortcutAction::Refresh => {
                self.controller.trigger();
            }
            ShortcutAction::ToggleTheme => {
                self.toggle_theme().await;
            }
            ShortcutAction::HideInfo => self.hide_info().await,
        }

        Some(action)
    }

    pub async fn state(&self) -> DashboardState {
        DashboardState {
            theme: self.theme().await,
            info_visible: self.info_visible().await,
            controller: self.controller.snapshot().await,
        }
    }

    /// The full page for the current display
    pub async fn render_page(&self) -> String {
        let ctx = PageContext {
            theme: self.theme().await,
            info_visible: self.info_visible().await,
        };
        let frame = self.controller.frame().await;
        render_page(&frame, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::{sample_document, FakeSource};
    use crate::controller::RefreshSettings;
    use crate::render::Renderer;
    use crate::ui::theme::MemoryThemeStore;
    use std::sync::Arc;
    use std::time::Duration;

    async fn dashboard(source: Arc<FakeSource>) -> Dashboard {
        let controller = RefreshController::new(
            source,
            Renderer::default(),
            RefreshSettings {
                animation: Duration::ZERO,
                ..Default::default()
            },
        );
        let theme = ThemeController::load(Arc::new(MemoryThemeStore::default())).await;
        Dashboard::new(controller, theme)
    }

    #[tokio::test]
    async fn test_info_overlay() {
        let dashboard = dashboard(Arc::new(FakeSource::new(Ok(sample_document(&[]))))).await;

        dashboard.show_info().await;
        assert!(dashboard.info_visible().await);

        let action = dashboard.handle_key(&KeyPress::new("Escape")).await;
        assert_eq!(action, Some(ShortcutAction::HideInfo));
        assert!(!dashboard.info_visible().await);
    }

    #[tokio::test]
    async fn test_theme_shortcut() {
        let dashboard = dashboard(Arc::new(FakeSource::new(Ok(sample_document(&[]))))).await;

        dashboard
            .handle_key(&KeyPress::new("t").with_meta())
            .await;
        assert_eq!(dashboard.theme().await, Theme::Dark);
        assert!(dashboard.render_page().await.contains("data-theme=\"dark\""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_shortcut_starts_fetch() {
        let source = Arc::new(FakeSource::new(Ok(sample_document(&["AAPL"]))));
        let dashboard = dashboard(source.clone()).await;

        let action = dashboard.handle_key(&KeyPress::new("r").with_ctrl()).await;
        assert_eq!(action, Some(ShortcutAction::Refresh));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 1);
        assert!(dashboard.render_page().await.contains("(AAPL)"));
    }

    #[tokio::test]
    async fn test_unbound_key() {
        let dashboard = dashboard(Arc::new(FakeSource::new(Ok(sample_document(&[]))))).await;
        assert_eq!(dashboard.handle_key(&KeyPress::new("x")).await, None);
    }
}
