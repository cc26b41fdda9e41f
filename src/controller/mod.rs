//! Refresh Control
//!
//! The refresh state machine and the display state it drives.
//!
//! ```text
//!   Idle | Displaying | Failed ──refresh/tick──▶ Fetching
//!   Fetching ──ok──▶ Displaying
//!   Fetching ──fetch error──▶ Failed(kind)
//!   Fetching ──render error──▶ Failed(InvalidFormat)
//! ```

mod display;
mod refresh;
mod state;

pub use display::{Display, DisplayFrame, Panels};
pub use refresh::{
    ControllerSnapshot, RefreshController, RefreshSettings, DEFAULT_INTERVAL,
    DEFAULT_RESUME_DEBOUNCE,
};
pub use state::{LifecycleEvent, Phase, RefreshOutcome};

#[cfg(test)]
pub(crate) use refresh::tests as testing;
