//! Counter Animation
//!
//! Numeric statistics count up to their new value with an ease-out curve.
//! Animations are sampled, never driven: the displayed value is computed
//! from the elapsed time whenever the view is read, so there is no task to
//! cancel and a newer target simply replaces the older animation.

use std::time::Duration;
use tokio::time::Instant;

/// Default time for a counter to reach its target
pub const DEFAULT_DURATION: Duration = Duration::from_millis(1000);

/// An interpolation between two integers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountAnimation {
    from: i64,
    to: i64,
    started: Instant,
    duration: Duration,
}

impl CountAnimation {
    pub fn new(from: i64, to: i64, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    pub fn target(&self) -> i64 {
        self.to
    }

    /// Fraction of the animation completed at `now`, in `0.0..=1.0`
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Value displayed at `now` (ease-out cubic)
    pub fn value_at(&self, now: Instant) -> i64 {
        let progress = self.progress(now);
        let eased = 1.0 - (1.0 - progress).powi(3);
        let difference = (self.to - self.from) as f64;
        (self.from as f64 + difference * eased).round() as i64
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// A numeric display element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counter {
    animation: Option<CountAnimation>,
}

impl Counter {
    /// Value shown at `now`
    pub fn value(&self, now: Instant) -> i64 {
        self.animation.map(|a| a.value_at(now)).unwrap_or(0)
    }

    /// Animate from the currently shown value to `target`
    pub fn animate_to(&mut self, target: i64, now: Instant, duration: Duration) {
        let from = self.value(now);
        self.animation = Some(CountAnimation::new(from, target, now, duration));
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.animation.is_some_and(|a| !a.is_finished(now))
    }
}
