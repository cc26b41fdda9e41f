//! Dashboard shell: theme, shortcuts, info overlay and page assembly.

mod dashboard;
mod keyboard;
mod page;
mod theme;

pub use dashboard::{Dashboard, DashboardState};
pub use keyboard::{resolve as resolve_shortcut, KeyPress, ShortcutAction};
pub use page::{page, render_page, PageContext};
pub use theme::{FileThemeStore, MemoryThemeStore, Theme, ThemeController, ThemeError, ThemeStore};
