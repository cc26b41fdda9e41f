//! Dashboard Rendering
//!
//! Maps a fetched [`ScreenerDocument`] to the statistics panel and the list
//! of stock cards. Rendering is pure: the same document and formatter always
//! produce the same output.
//!
//! ## Validation
//!
//! Documents are validated before anything is produced. A missing
//! `metadata` object or a `filtered_stocks` field that is not a sequence
//! yields [`RenderError::InvalidFormat`]; no partial list is ever returned.

mod card;

pub use card::{primary_signal, stock_card, SignalKind};

use thiserror::Error;

use crate::document::{DocumentError, ScreenerDocument};
use crate::format::{count_value, format_percent, Formatter};
use crate::view::Element;

/// Errors that can occur while rendering a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid data format received: {0}")]
    InvalidFormat(#[from] DocumentError),
}

/// Values for the statistics panel
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    /// Counter target for analyzed tickers
    pub total_analyzed: i64,
    /// Counter targets for the signal breakdown; `None` leaves the counter as is
    pub signal1_count: Option<i64>,
    pub signal2_count: Option<i64>,
    /// Success rate as a percentage string
    pub success_rate: String,
    /// Last update time; `None` leaves the previous value in place
    pub last_updated: Option<LastUpdated>,
}

/// Formatted last-update time with its tooltip text
#[derive(Debug, Clone, PartialEq)]
pub struct LastUpdated {
    pub text: String,
    pub tooltip: String,
}

/// Output of a successful render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDashboard {
    pub stats: StatsView,
    /// Cards in document order
    pub cards: Vec<Element>,
}

impl RenderedDashboard {
    /// Whether the empty indicator should replace the list
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Builds view trees from screener documents
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    formatter: Formatter,
}

impl Renderer {
    /// Create a renderer using the given formatter
    pub fn new(formatter: Formatter) -> Self {
        Self { formatter }
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Validate and render a document
    pub fn render(&self, doc: &ScreenerDocument) -> Result<RenderedDashboard, RenderError> {
        let doc = doc.validate()?;

        let last_updated = doc
            .metadata
            .last_updated
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(|raw| LastUpdated {
                text: self.formatter.format_date_time(raw),
                tooltip: self.formatter.format_full(raw),
            });

        let stats = StatsView {
            total_analyzed: count_value(doc.metadata.total_analyzed),
            signal1_count: doc
                .signal_breakdown
                .as_ref()
                .map(|b| count_value(b.signal1_count)),
            signal2_count: doc
                .signal_breakdown
                .as_ref()
                .map(|b| count_value(b.signal2_count)),
            success_rate: format_percent(doc.metadata.success_rate),
            last_updated,
        };

        let cards = doc
            .stocks
            .iter()
            .enumerate()
            .map(|(index, stock)| stock_card(stock, index, &self.formatter))
            .collect::<Vec<_>>();

        tracing::debug!(cards = cards.len(), "Rendered screener document");

        Ok(RenderedDashboard { stats, cards })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn entry(ticker: &str, market: &str, price: Value) -> Value {
        json!({
            "ticker": ticker,
            "market": market,
            "current_price": price,
            "volume_20_avg": 250000,
            "signals": {
                "signal1": { "entry": { "breakout_level": 10.0, "exit_level": 9.0, "date": "2024-01-15" }, "exit": null },
                "signal2": { "entry": null, "exit": null }
            }
        })
    }

    fn document(stocks: Vec<Value>) -> ScreenerDocument {
        ScreenerDocument::from_value(json!({
            "metadata": {
                "last_updated": "2024-01-15T21:30:00Z",
                "total_analyzed": 1500,
                "success_rate": 98.5
            },
            "signal_breakdown": { "signal1_count": 3, "signal2_count": 1 },
            "filtered_stocks": stocks
        }))
    }

    #[test]
    fn test_cards_preserve_order() {
        let doc = document(vec![
            entry("MSFT", "US", json!(410.0)),
            entry("005930.KS", "KRX", json!(71500.0)),
            entry("AAPL", "US", json!(189.5)),
        ]);
        let rendered = Renderer::default().render(&doc).unwrap();

        assert_eq!(rendered.cards.len(), 3);
        let tickers: Vec<_> = rendered
            .cards
            .iter()
            .map(|c| c.find_by_class("ticker-code")[0].text_content())
            .collect();
        assert_eq!(tickers, vec!["(MSFT)", "(005930.KS)", "(AAPL)"]);
    }

    #[test]
    fn test_market_aware_prices() {
        let doc = document(vec![
            entry("005930.KS", "KRX", json!(71500.0)),
            entry("AAPL", "US", json!(189.5)),
            entry("BAD", "US", json!("n/a")),
        ]);
        let rendered = Renderer::default().render(&doc).unwrap();
        let prices: Vec<_> = rendered
            .cards
            .iter()
            .map(|c| c.find_by_class("stock-price")[0].text_content())
            .collect();

        assert_eq!(prices, vec!["₩71,500", "189.50", "0.00"]);
    }

    #[test]
    fn test_stats() {
        let rendered = Renderer::default().render(&document(vec![])).unwrap();

        assert!(rendered.is_empty());
        assert_eq!(rendered.stats.total_analyzed, 1500);
        assert_eq!(rendered.stats.signal1_count, Some(3));
        assert_eq!(rendered.stats.signal2_count, Some(1));
        assert_eq!(rendered.stats.success_rate, "98.5%");
        assert_eq!(
            rendered.stats.last_updated,
            Some(LastUpdated {
                text: "Jan 15, 9:30 PM".to_string(),
                tooltip: "1/15/2024, 9:30:00 PM".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_breakdown_leaves_counters() {
        let doc = ScreenerDocument::from_value(json!({
            "metadata": {},
            "filtered_stocks": []
        }));
        let rendered = Renderer::default().render(&doc).unwrap();

        assert_eq!(rendered.stats.total_analyzed, 0);
        assert_eq!(rendered.stats.signal1_count, None);
        assert_eq!(rendered.stats.success_rate, "0%");
        assert!(rendered.stats.last_updated.is_none());
    }

    #[test]
    fn test_invalid_documents() {
        let renderer = Renderer::default();

        for raw in [
            json!(null),
            json!([]),
            json!({ "filtered_stocks": [] }),
            json!({ "metadata": {}, "filtered_stocks": "AAPL" }),
            json!({ "metadata": {}, "filtered_stocks": [42] }),
        ] {
            let result = renderer.render(&ScreenerDocument::from_value(raw));
            assert!(matches!(result, Err(RenderError::InvalidFormat(_))));
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let doc = document(vec![entry("AAPL", "US", json!(189.5))]);
        let renderer = Renderer::default();
        assert_eq!(renderer.render(&doc).unwrap(), renderer.render(&doc).unwrap());
    }
}
