//! Refresh Controller
//!
//! Orchestrates fetch, render and display transitions. At most one fetch is
//! in flight: the `is_fetching` flag is checked and set under the state lock
//! before any work starts, and cleared unconditionally when the fetch ends.
//!
//! Background work (the poll timer and the debounced resume refresh) never
//! runs a fetch inline. Both spawn a detached refresh, so aborting a timer
//! can never strand the in-flight flag.

use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{Instant, MissedTickBehavior};

use super::display::{Display, DisplayFrame};
use super::state::{LifecycleEvent, Phase, RefreshOutcome, RefreshState};
use crate::animate::DEFAULT_DURATION;
use crate::error::ErrorKind;
use crate::fetch::DocumentSource;
use crate::render::Renderer;

/// Default time between automatic refreshes
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Default delay before refreshing when the view becomes visible
pub const DEFAULT_RESUME_DEBOUNCE: Duration = Duration::from_millis(1000);

/// View key for lifecycle events that name no view
const UNNAMED_VIEW: &str = "";

/// Upper bound on remembered views
const MAX_TRACKED_VIEWS: usize = 256;

/// Timing parameters for the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    pub interval: Duration,
    pub resume_debounce: Duration,
    pub animation: Duration,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            resume_debounce: DEFAULT_RESUME_DEBOUNCE,
            animation: DEFAULT_DURATION,
        }
    }
}

/// Point-in-time view of the controller
#[derive(Debug, Clone, serde::Serialize)]
pub struct ControllerSnapshot {
    pub phase: Phase,
    pub fetching: bool,
    pub polling: bool,
    pub source: String,
    pub display: DisplayFrame,
}

struct Inner {
    source: Arc<dyn DocumentSource>,
    renderer: Renderer,
    settings: RefreshSettings,
    state: Mutex<RefreshState>,
    display: RwLock<Display>,
}

/// Owns the refresh state and the display it drives
#[derive(Clone)]
pub struct RefreshController {
    inner: Arc<Inner>,
}

impl RefreshController {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        renderer: Renderer,
        settings: RefreshSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                renderer,
                settings,
                state: Mutex::new(RefreshState::default()),
                display: RwLock::new(Display::new(settings.animation)),
            }),
        }
    }

    fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn settings(&self) -> RefreshSettings {
        self.inner.settings
    }

    /// Initial refresh plus the poll timer
    pub async fn start(&self) -> RefreshOutcome {
        self.start_polling().await;
        self.refresh().await
    }

    /// Fetch, render and display the document.
    ///
    /// Returns [`RefreshOutcome::Skipped`] without doing anything when a
    /// fetch is already in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        if !self.claim().await {
            return RefreshOutcome::Skipped;
        }
        self.run_claimed().await
    }

    /// Start a refresh in the background
    pub fn trigger(&self) -> tokio::task::JoinHandle<RefreshOutcome> {
        let this = self.clone();
        tokio::spawn(async move { this.refresh().await })
    }

    /// Start a refresh in the background unless one is in flight
    pub async fn try_trigger(&self) -> bool {
        if !self.claim().await {
            return false;
        }
        let this = self.clone();
        tokio::spawn(async move { this.run_claimed().await });
        true
    }

    /// Run a claimed cycle to completion and release the flag, even when the
    /// cycle panics
    async fn run_claimed(&self) -> RefreshOutcome {
        // The cycle runs on its own task so a dropped caller cannot cancel it
        // halfway and leave the flag set.
        let this = self.clone();
        match tokio::spawn(async move { this.run().await }).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Refresh task failed");
                let error = ErrorKind::Other(e.to_string());
                self.inner.display.write().await.hide_loading();
                self.finish(Phase::Failed {
                    error: error.clone(),
                })
                .await;
                self.fail(error).await
            }
        }
    }

    /// Check and set the in-flight flag in one critical section
    async fn claim(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        if state.disposed || state.is_fetching {
            tracing::debug!("Refresh skipped, fetch already in flight");
            return false;
        }
        state.is_fetching = true;
        state.phase = Phase::Fetching;
        true
    }

    async fn run(&self) -> RefreshOutcome {
        self.inner.display.write().await.show_loading();

        let outcome = match self.inner.source.fetch().await {
            Ok(doc) => match self.inner.renderer.render(&doc) {
                Ok(rendered) => {
                    let stocks = rendered.cards.len();
                    let mut display = self.inner.display.write().await;
                    display.apply(rendered, Instant::now());
                    display.show_results();
                    display.hide_error();
                    tracing::info!(stocks, source = %self.inner.source.location(), "Screener data displayed");
                    RefreshOutcome::Displayed { stocks }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Screener document rejected");
                    self.fail(ErrorKind::from(&e)).await
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, source = %self.inner.source.location(), "Failed to load screener data");
                self.fail(ErrorKind::from(&e)).await
            }
        };

        self.inner.display.write().await.hide_loading();

        let phase = match &outcome {
            RefreshOutcome::Displayed { stocks } => Phase::Displaying { stocks: *stocks },
            RefreshOutcome::Failed { error } => Phase::Failed {
                error: error.clone(),
            },
            RefreshOutcome::Skipped => Phase::Idle,
        };
        self.finish(phase).await;

        outcome
    }

    async fn fail(&self, error: ErrorKind) -> RefreshOutcome {
        self.inner
            .display
            .write()
            .await
            .show_error(error.user_message());
        RefreshOutcome::Failed { error }
    }

    async fn finish(&self, phase: Phase) {
        let mut state = self.inner.state.lock().await;
        state.is_fetching = false;
        state.phase = phase;
    }

    /// Start the poll timer, replacing any existing one
    pub async fn start_polling(&self) {
        let mut state = self.inner.state.lock().await;
        if state.disposed {
            return;
        }

        let period = self.inner.settings.interval;
        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(controller) = Self::from_weak(&weak) else {
                    break;
                };
                tracing::debug!("Scheduled refresh");
                controller.trigger();
            }
        });

        if state.stop_timer() {
            tracing::debug!("Replaced existing poll timer");
        }
        state.poll_timer = Some(handle);
        tracing::info!(interval_secs = period.as_secs(), "Auto-refresh started");
    }

    /// Suspend the poll timer
    pub async fn stop_polling(&self) {
        if self.inner.state.lock().await.stop_timer() {
            tracing::info!("Auto-refresh stopped");
        }
    }

    pub async fn is_polling(&self) -> bool {
        self.inner.state.lock().await.is_polling()
    }

    /// React to a visibility or connectivity change from an unnamed view
    pub async fn handle_lifecycle(&self, event: LifecycleEvent) {
        self.handle_view_lifecycle(None, event).await
    }

    /// React to a visibility or connectivity change from one view.
    ///
    /// Polling is suspended only once every known view is hidden. A view
    /// becoming visible resumes polling (with a debounced refresh) when the
    /// timer was suspended, and otherwise only re-debounces a pending resume.
    pub async fn handle_view_lifecycle(&self, view: Option<&str>, event: LifecycleEvent) {
        if self.inner.state.lock().await.disposed {
            return;
        }
        tracing::debug!(?event, ?view, "Lifecycle event");
        let view = view.unwrap_or(UNNAMED_VIEW);

        match event {
            LifecycleEvent::Hidden => {
                let mut state = self.inner.state.lock().await;
                state.visible_views.remove(view);
                if !state.visible_views.is_empty() {
                    tracing::debug!(
                        visible = state.visible_views.len(),
                        "Other views visible, polling continues"
                    );
                    return;
                }
                state.cancel_resume();
                if state.stop_timer() {
                    tracing::info!("Auto-refresh suspended while hidden");
                }
            }
            LifecycleEvent::Visible => {
                let resume = {
                    let mut state = self.inner.state.lock().await;
                    if state.visible_views.len() < MAX_TRACKED_VIEWS
                        || state.visible_views.contains(view)
                    {
                        state.visible_views.insert(view.to_string());
                    }
                    !state.is_polling() || state.resume_pending()
                };
                if resume {
                    self.start_polling().await;
                    self.schedule_resume().await;
                }
            }
            LifecycleEvent::Online => {
                tracing::info!("Connection restored, refreshing");
                self.trigger();
            }
            LifecycleEvent::Offline => self.show_offline().await,
        }
    }

    /// Refresh after the debounce delay, superseding any pending resume
    async fn schedule_resume(&self) {
        let delay = self.inner.settings.resume_debounce;
        let weak = Arc::downgrade(&self.inner);

        let mut state = self.inner.state.lock().await;
        state.cancel_resume();
        state.pending_resume = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(controller) = Self::from_weak(&weak) {
                controller.trigger();
            }
        }));
    }

    async fn show_offline(&self) {
        tracing::warn!("Connection lost");
        self.inner
            .display
            .write()
            .await
            .show_error(ErrorKind::Offline.user_message());

        let mut state = self.inner.state.lock().await;
        if !state.is_fetching {
            state.phase = Phase::Failed {
                error: ErrorKind::Offline,
            };
        }
    }

    /// Abort every timer; later refreshes and lifecycle events are ignored
    pub async fn dispose(&self) {
        let mut state = self.inner.state.lock().await;
        state.disposed = true;
        state.stop_timer();
        state.cancel_resume();
        tracing::info!("Refresh controller disposed");
    }

    pub async fn phase(&self) -> Phase {
        self.inner.state.lock().await.phase.clone()
    }

    /// Sample the display now
    pub async fn frame(&self) -> DisplayFrame {
        self.inner.display.read().await.frame(Instant::now())
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        let (phase, fetching, polling) = {
            let state = self.inner.state.lock().await;
            (state.phase.clone(), state.is_fetching, state.is_polling())
        };

        ControllerSnapshot {
            phase,
            fetching,
            polling,
            source: self.inner.source.location().to_string(),
            display: self.frame().await,
        }
    }
}
