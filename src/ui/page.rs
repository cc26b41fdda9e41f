//! Full page assembly from a display frame

use crate::controller::DisplayFrame;
use crate::ui::theme::Theme;
use crate::view::{Element, Node, CLIENT_SCRIPT, STYLES};

const TITLE: &str = "Stock Screener Dashboard";

/// Everything the page shows besides the display itself
#[derive(Debug, Clone, Copy)]
pub struct PageContext {
    pub theme: Theme,
    pub info_visible: bool,
}

/// Build the page as a view tree
pub fn page(frame: &DisplayFrame, ctx: PageContext) -> Element {
    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "UTF-8"))
        .child(
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1.0"),
        )
        .child(Element::new("title").text(TITLE))
        .child(Element::new("style").child(Node::Static(STYLES)));

    let body = Element::new("body")
        .class_if(ctx.info_visible, "no-scroll")
        .child(header(frame, ctx.theme))
        .child(
            Element::new("main")
                .child(loading_panel(frame))
                .child(error_panel(frame))
                .child(stats_panel(frame))
                .child(results_panel(frame)),
        )
        .child(info_modal(ctx.info_visible))
        .child(Element::new("script").child(Node::Static(CLIENT_SCRIPT)));

    Element::new("html")
        .attr("lang", "en")
        .attr("data-theme", ctx.theme.as_str())
        .attr("data-version", frame.version.to_string())
        .attr("data-animating", frame.animating.to_string())
        .child(head)
        .child(body)
}

/// Serialize the page with its doctype
pub fn render_page(frame: &DisplayFrame, ctx: PageContext) -> String {
    let mut out = String::from("<!DOCTYPE html>");
    Node::from(page(frame, ctx)).write_html(&mut out);
    out
}

fn header(frame: &DisplayFrame, theme: Theme) -> Element {
    let actions = Element::new("div")
        .class("header-actions")
        .child(
            Element::new("button")
                .id("refreshBtn")
                .attr("data-action", "refresh")
                .attr("title", "Refresh (Ctrl+R)")
                .class_if(!frame.refresh_enabled, "loading")
                .flag("disabled", !frame.refresh_enabled)
                .text("Refresh"),
        )
        .child(
            Element::new("button")
                .id("themeToggle")
                .attr("data-action", "theme")
                .attr("title", "Toggle theme (Ctrl+T)")
                .child(Element::new("span").class("theme-icon").text(theme.icon())),
        )
        .child(
            Element::new("button")
                .id("infoBtn")
                .attr("data-action", "show-info")
                .text("About"),
        );

    Element::new("header")
        .class("app-header")
        .child(Element::new("h1").text("Stock Screener"))
        .child(actions)
}

fn panel(tag: &'static str, id: &'static str, class: &'static str, visible: bool) -> Element {
    Element::new(tag).id(id).class(class).class_if(!visible, "hidden")
}

fn loading_panel(frame: &DisplayFrame) -> Element {
    panel("div", "loading", "loading-panel", frame.panels.loading)
        .child(Element::new("p").text("Loading screener results..."))
}

fn error_panel(frame: &DisplayFrame) -> Element {
    panel("div", "error", "error-panel", frame.panels.error)
        .child(
            Element::new("p")
                .id("errorMessage")
                .text(frame.error_message.clone()),
        )
        .child(
            Element::new("button")
                .attr("data-action", "refresh")
                .text("Try Again"),
        )
}

fn stat(id: &'static str, label: &'static str, value: String) -> Element {
    Element::new("div")
        .class("stat-card")
        .child(Element::new("div").class("stat-label").text(label))
        .child(Element::new("div").id(id).class("stat-value").text(value))
}

fn stats_panel(frame: &DisplayFrame) -> Element {
    let mut last_updated = stat(
        "lastUpdated",
        "Last Updated",
        frame.last_updated.clone().unwrap_or_else(|| "-".to_string()),
    );
    if let Some(full) = &frame.last_updated_full {
        last_updated = last_updated.attr("title", full.clone());
    }

    panel("section", "stats", "stats-grid", frame.panels.stats)
        .class_if(frame.panels.stats, "fade-in")
        .child(stat(
            "totalAnalyzed",
            "Total Analyzed",
            frame.total_analyzed.to_string(),
        ))
        .child(stat(
            "signal1Count",
            "Signal 1",
            frame.signal1_count.to_string(),
        ))
        .child(stat(
            "signal2Count",
            "Signal 2",
            frame.signal2_count.to_string(),
        ))
        .child(stat("successRate", "Success Rate", frame.success_rate.clone()))
        .child(last_updated)
}

fn results_panel(frame: &DisplayFrame) -> Element {
    panel("section", "results", "results", frame.panels.results)
        .class_if(frame.panels.results, "fade-in")
        .child(Element::new("h2").text("Filtered Stocks"))
        .child(
            Element::new("div")
                .id("stocksList")
                .class("stocks-list")
                .children(frame.cards.iter().cloned()),
        )
        .child(
            panel("div", "emptyState", "empty-state", frame.panels.empty)
                .child(Element::new("p").text("No stocks currently match the screening criteria.")),
        )
}

fn info_modal(visible: bool) -> Element {
    panel("div", "aboutModal", "modal", visible).child(
        Element::new("div")
            .class("modal-content")
            .child(Element::new("h2").text("About"))
            .child(Element::new("p").text(
                "Results of a daily breakout screener over KRX and US markets. \
                 Signal 1 tracks 20-day breakouts, Signal 2 tracks 55-day breakouts.",
            ))
            .child(Element::new("p").text(
                "Data refreshes every 15 minutes. Ctrl+R refreshes, Ctrl+T toggles the theme, Escape closes this panel.",
            ))
            .child(
                Element::new("button")
                    .attr("data-action", "hide-info")
                    .text("Close"),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Display;
    use tokio::time::Instant;

    fn ctx(theme: Theme, info_visible: bool) -> PageContext {
        PageContext {
            theme,
            info_visible,
        }
    }

    #[test]
    fn test_initial_page() {
        let frame = Display::default().frame(Instant::now());
        let html = render_page(&frame, ctx(Theme::Light, false));

        assert!(html.starts_with("<!DOCTYPE html><html lang=\"en\" data-theme=\"light\""));
        assert!(html.contains("<div class=\"loading-panel hidden\" id=\"loading\">"));
        assert!(html.contains("<div class=\"modal hidden\" id=\"aboutModal\">"));
        assert!(html.contains("<span class=\"theme-icon\">🌙</span>"));
    }

    #[test]
    fn test_loading_disables_refresh() {
        let mut display = Display::default();
        display.show_loading();
        let html = render_page(&display.frame(Instant::now()), ctx(Theme::Dark, false));

        assert!(html.contains("data-theme=\"dark\""));
        assert!(html.contains("<button class=\"loading\" id=\"refreshBtn\""));
        assert!(html.contains("title=\"Refresh (Ctrl+R)\" disabled>"));
        assert!(html.contains("<div class=\"loading-panel\" id=\"loading\">"));
    }

    #[test]
    fn test_error_message_is_escaped() {
        let mut display = Display::default();
        display.show_error("<img src=x onerror=alert(1)>");
        let html = render_page(&display.frame(Instant::now()), ctx(Theme::Light, true));

        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!html.contains("<img"));
        assert!(html.contains("<body class=\"no-scroll\">"));
        assert!(html.contains("<div class=\"modal\" id=\"aboutModal\">"));
    }
}
