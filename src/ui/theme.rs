//! Theme Preference
//!
//! The light/dark preference lives outside the dashboard core, behind an
//! injected [`ThemeStore`] that reads and writes a plain string.

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from theme persistence
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown theme: {0}")]
    Unknown(String),
}

/// Color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon for the toggle button; shows the theme a click switches to
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ThemeError::Unknown(other.to_string())),
        }
    }
}

/// Persistent storage for the theme preference
#[async_trait]
pub trait ThemeStore: Send + Sync {
    async fn get(&self) -> Result<Option<String>, ThemeError>;
    async fn set(&self, value: &str) -> Result<(), ThemeError>;
}

/// Stores the preference in a small text file
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ThemeStore for FileThemeStore {
    async fn get(&self) -> Result<Option<String>, ThemeError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, value: &str) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, value).await?;
        Ok(())
    }
}

/// Keeps the preference in memory only
#[derive(Default)]
pub struct MemoryThemeStore {
    value: RwLock<Option<String>>,
}

#[async_trait]
impl ThemeStore for MemoryThemeStore {
    async fn get(&self) -> Result<Option<String>, ThemeError> {
        Ok(self.value.read().await.clone())
    }

    async fn set(&self, value: &str) -> Result<(), ThemeError> {
        *self.value.write().await = Some(value.to_string());
        Ok(())
    }
}

/// Current theme backed by a store
pub struct ThemeController {
    store: Arc<dyn ThemeStore>,
    current: RwLock<Theme>,
}

impl ThemeController {
    /// Load the saved preference, falling back to light
    pub async fn load(store: Arc<dyn ThemeStore>) -> Self {
        let theme = match store.get().await {
            Ok(Some(saved)) => saved.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring saved theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read saved theme");
                Theme::default()
            }
        };

        Self {
            store,
            current: RwLock::new(theme),
        }
    }

    pub async fn current(&self) -> Theme {
        *self.current.read().await
    }

    /// Apply and persist a theme. The theme is applied even when saving fails.
    pub async fn set(&self, theme: Theme) -> Result<Theme, ThemeError> {
        *self.current.write().await = theme;
        self.store.set(theme.as_str()).await?;
        tracing::debug!(theme = theme.as_str(), "Theme saved");
        Ok(theme)
    }

    pub async fn toggle(&self) -> Result<Theme, ThemeError> {
        let next = self.current().await.toggled();
        self.set(next).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_defaults_to_light() {
        let controller = ThemeController::load(Arc::new(MemoryThemeStore::default())).await;
        assert_eq!(controller.current().await, Theme::Light);
    }

    #[tokio::test]
    async fn test_toggle_persists() {
        let store = Arc::new(MemoryThemeStore::default());
        let controller = ThemeController::load(store.clone()).await;

        assert_eq!(controller.toggle().await.unwrap(), Theme::Dark);
        assert_eq!(store.get().await.unwrap().as_deref(), Some("dark"));

        assert_eq!(controller.toggle().await.unwrap(), Theme::Light);
        assert_eq!(store.get().await.unwrap().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("theme");

        let controller = ThemeController::load(Arc::new(FileThemeStore::new(&path))).await;
        controller.toggle().await.unwrap();

        let reloaded = ThemeController::load(Arc::new(FileThemeStore::new(&path))).await;
        assert_eq!(reloaded.current().await, Theme::Dark);
    }

    #[tokio::test]
    async fn test_garbage_falls_back() {
        let store = Arc::new(MemoryThemeStore::default());
        store.set("solarized").await.unwrap();

        let controller = ThemeController::load(store).await;
        assert_eq!(controller.current().await, Theme::Light);
    }
}
