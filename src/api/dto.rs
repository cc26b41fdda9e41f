//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.

use serde::{Deserialize, Serialize};

use crate::controller::{LifecycleEvent, Phase};
use crate::ui::{ShortcutAction, Theme};

// ============================================
// CONTROL DTOs
// ============================================

/// Manual refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Status: "started"
    pub status: String,
}

/// Theme toggle response
#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

/// Info overlay response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub visible: bool,
}

/// Key press response; `action` is null when the key is not bound
#[derive(Debug, Serialize)]
pub struct KeyResponse {
    pub action: Option<ShortcutAction>,
}

/// Longest accepted view id
pub const MAX_VIEW_ID_LEN: usize = 64;

/// Lifecycle notification request
#[derive(Debug, Deserialize)]
pub struct LifecycleRequest {
    pub event: LifecycleEvent,
    /// Id of the page instance sending the event, stable across reloads
    #[serde(default)]
    pub view: Option<String>,
}

/// Lifecycle notification response
#[derive(Debug, Serialize)]
pub struct LifecycleResponse {
    /// Status: "accepted"
    pub status: String,
    pub event: LifecycleEvent,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded, starting
    pub status: String,
    /// Refresh state machine phase
    pub phase: Phase,
    /// Whether the poll timer is running
    pub polling: bool,
    /// Where the document is read from
    pub source: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
