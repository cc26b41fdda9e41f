//! Keyboard shortcuts
//!
//! | Keys | Action |
//! |---|---|
//! | Ctrl+R / Cmd+R | refresh |
//! | Ctrl+T / Cmd+T | toggle theme |
//! | Escape | hide the info overlay |

use serde::{Deserialize, Serialize};

/// A key press forwarded from the view
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeyPress {
    /// The `KeyboardEvent.key` value, matched case-sensitively
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    /// Command on macOS
    #[serde(default)]
    pub meta: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What a shortcut asks the dashboard to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    Refresh,
    ToggleTheme,
    HideInfo,
}

/// Map a key press to its action, if it is bound
pub fn resolve(press: &KeyPress) -> Option<ShortcutAction> {
    match press.key.as_str() {
        "r" if press.command() => Some(ShortcutAction::Refresh),
        "t" if press.command() => Some(ShortcutAction::ToggleTheme),
        "Escape" => Some(ShortcutAction::HideInfo),
        _ => None,
    }
}
