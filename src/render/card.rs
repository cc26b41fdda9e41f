//! Stock Card Construction
//!
//! One card per screened stock. At most one signal block is shown even when
//! the source populates several; precedence is signal 1 entry, then signal 1
//! exit, then signal 2 entry.

use crate::document::{SignalInstance, Signals, StockEntry};
use crate::format::{format_price, format_volume, Formatter};
use crate::view::Element;

/// Which signal block a card displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Signal1Entry,
    Signal1Exit,
    Signal2Entry,
}

impl SignalKind {
    fn family(self) -> (&'static str, &'static str) {
        match self {
            SignalKind::Signal1Entry | SignalKind::Signal1Exit => ("Signal 1", "signal-1"),
            SignalKind::Signal2Entry => ("Signal 2", "signal-2"),
        }
    }

    fn direction(self) -> (&'static str, &'static str) {
        match self {
            SignalKind::Signal1Entry | SignalKind::Signal2Entry => ("Entry", "signal-entry"),
            SignalKind::Signal1Exit => ("Exit", "signal-exit"),
        }
    }
}

/// Pick the signal block to render, first match wins.
///
/// A lone `signal2.exit` is not rendered.
pub fn primary_signal(signals: &Signals) -> Option<(SignalKind, &SignalInstance)> {
    if let Some(entry) = &signals.signal1.entry {
        Some((SignalKind::Signal1Entry, entry))
    } else if let Some(exit) = &signals.signal1.exit {
        Some((SignalKind::Signal1Exit, exit))
    } else {
        signals
            .signal2
            .entry
            .as_ref()
            .map(|entry| (SignalKind::Signal2Entry, entry))
    }
}

/// Build the card for one stock; `index` drives the staggered entrance
pub fn stock_card(stock: &StockEntry, index: usize, formatter: &Formatter) -> Element {
    let market = stock.market.as_str();
    let primary = primary_signal(&stock.signals);

    let header = Element::new("div")
        .class("stock-header")
        .child(
            Element::new("div")
                .class("stock-ticker")
                .text(stock.display_name())
                .child(
                    Element::new("span")
                        .class("ticker-code")
                        .text(format!("({})", stock.ticker)),
                )
                .child(
                    Element::new("span")
                        .class("market-badge")
                        .class(format!("market-{}", class_token(market)))
                        .text(market),
                ),
        )
        .child(
            Element::new("div")
                .class("stock-price")
                .text(format_price(stock.current_price, market)),
        );

    let badges = match primary {
        Some((kind, _)) => {
            let (family, family_class) = kind.family();
            let (direction, direction_class) = kind.direction();
            vec![
                Element::new("span")
                    .class("signal-indicator")
                    .class(family_class)
                    .text(family),
                Element::new("span")
                    .class("signal-indicator")
                    .class(direction_class)
                    .text(direction),
            ]
        }
        None => Vec::new(),
    };

    let mut details = vec![detail_item(
        "20d Avg Volume",
        format_volume(stock.volume_20_avg),
    )];

    if let Some((kind, signal)) = primary {
        match kind {
            SignalKind::Signal1Entry => {
                details.push(detail_item(
                    "Breakout Level",
                    format_price(signal.breakout_level, market),
                ));
                details.push(detail_item(
                    "Exit Level",
                    format_price(signal.exit_level, market),
                ));
            }
            SignalKind::Signal1Exit => {
                details.push(detail_item(
                    "Breakdown Level",
                    format_price(signal.breakdown_level, market),
                ));
            }
            SignalKind::Signal2Entry => {
                details.push(detail_item(
                    "Breakout Level (55d)",
                    format_price(signal.breakout_level, market),
                ));
                details.push(detail_item(
                    "Exit Level",
                    format_price(signal.exit_level, market),
                ));
            }
        }
        details.push(detail_item(
            "Signal Date",
            formatter.format_date(signal.date.as_deref()),
        ));
    }

    Element::new("div")
        .class("stock-card")
        .class("slide-up")
        .attr("style", format!("animation-delay: {:.1}s", index as f64 * 0.1))
        .child(header)
        .child(Element::new("div").class("stock-signal").children(badges))
        .child(Element::new("div").class("stock-details").children(details))
}

fn detail_item(label: &str, value: String) -> Element {
    Element::new("div")
        .class("detail-item")
        .child(Element::new("span").class("detail-label").text(label))
        .child(Element::new("span").class("detail-value").text(value))
}

/// Lower-cased market name restricted to class-safe characters
fn class_token(market: &str) -> String {
    market
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
