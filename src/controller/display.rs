//! Display State
//!
//! The in-process equivalent of the page's DOM: which panels are visible,
//! whether the refresh trigger is enabled, the error text, the statistics
//! elements and the rendered card list. Only the refresh controller mutates
//! it; readers take a [`DisplayFrame`] sampled at a point in time.

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

use crate::animate::{Counter, DEFAULT_DURATION};
use crate::render::{LastUpdated, RenderedDashboard};
use crate::view::Element;

/// Visibility of the dashboard panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Panels {
    pub loading: bool,
    pub error: bool,
    pub stats: bool,
    pub results: bool,
    pub empty: bool,
}

/// Mutable display tree
#[derive(Debug, Clone)]
pub struct Display {
    panels: Panels,
    refresh_enabled: bool,
    error_message: String,
    total_analyzed: Counter,
    signal1_count: Counter,
    signal2_count: Counter,
    success_rate: String,
    last_updated: Option<LastUpdated>,
    cards: Vec<Element>,
    animation: Duration,
    version: u64,
}

impl Default for Display {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl Display {
    /// Create an empty display whose counters animate over `animation`
    pub fn new(animation: Duration) -> Self {
        Self {
            panels: Panels::default(),
            refresh_enabled: true,
            error_message: String::new(),
            total_analyzed: Counter::default(),
            signal1_count: Counter::default(),
            signal2_count: Counter::default(),
            success_rate: "0%".to_string(),
            last_updated: None,
            cards: Vec::new(),
            animation,
            version: 0,
        }
    }

    pub fn panels(&self) -> Panels {
        self.panels
    }

    pub fn refresh_enabled(&self) -> bool {
        self.refresh_enabled
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn cards(&self) -> &[Element] {
        &self.cards
    }

    /// Incremented on every mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Show the loading indicator and disable the refresh trigger
    pub fn show_loading(&mut self) {
        self.panels.loading = true;
        self.refresh_enabled = false;
        self.touch();
    }

    /// Hide the loading indicator and re-enable the refresh trigger
    pub fn hide_loading(&mut self) {
        self.panels.loading = false;
        self.refresh_enabled = true;
        self.touch();
    }

    /// Show the error panel and hide every result panel
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.panels.error = true;
        self.error_message = message.into();
        self.hide_results();
    }

    pub fn hide_error(&mut self) {
        self.panels.error = false;
        self.touch();
    }

    /// Reveal statistics and results
    pub fn show_results(&mut self) {
        self.panels.stats = true;
        self.panels.results = true;
        self.touch();
    }

    /// Hide statistics, results and the empty indicator
    pub fn hide_results(&mut self) {
        self.panels.stats = false;
        self.panels.results = false;
        self.panels.empty = false;
        self.touch();
    }

    /// Write a rendered document into the statistics and list elements
    pub fn apply(&mut self, rendered: RenderedDashboard, now: Instant) {
        let stats = rendered.stats;

        self.total_analyzed
            .animate_to(stats.total_analyzed, now, self.animation);
        if let Some(count) = stats.signal1_count {
            self.signal1_count.animate_to(count, now, self.animation);
        }
        if let Some(count) = stats.signal2_count {
            self.signal2_count.animate_to(count, now, self.animation);
        }
        self.success_rate = stats.success_rate;
        if let Some(last_updated) = stats.last_updated {
            self.last_updated = Some(last_updated);
        }

        self.panels.empty = rendered.cards.is_empty();
        self.cards = rendered.cards;
        self.touch();
    }

    /// Sample the display at `now`
    pub fn frame(&self, now: Instant) -> DisplayFrame {
        DisplayFrame {
            panels: self.panels,
            refresh_enabled: self.refresh_enabled,
            error_message: self.error_message.clone(),
            total_analyzed: self.total_analyzed.value(now),
            signal1_count: self.signal1_count.value(now),
            signal2_count: self.signal2_count.value(now),
            success_rate: self.success_rate.clone(),
            last_updated: self.last_updated.as_ref().map(|l| l.text.clone()),
            last_updated_full: self.last_updated.as_ref().map(|l| l.tooltip.clone()),
            animating: self.total_analyzed.is_animating(now)
                || self.signal1_count.is_animating(now)
                || self.signal2_count.is_animating(now),
            card_count: self.cards.len(),
            cards: self.cards.clone(),
            version: self.version,
        }
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// A point-in-time copy of the display
#[derive(Debug, Clone, Serialize)]
pub struct DisplayFrame {
    pub panels: Panels,
    pub refresh_enabled: bool,
    pub error_message: String,
    pub total_analyzed: i64,
    pub signal1_count: i64,
    pub signal2_count: i64,
    pub success_rate: String,
    pub last_updated: Option<String>,
    pub last_updated_full: Option<String>,
    pub animating: bool,
    pub card_count: usize,
    #[serde(skip)]
    pub cards: Vec<Element>,
    pub version: u64,
}
