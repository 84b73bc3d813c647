#![forbid(unsafe_code)]

//! Price history for a single coin: sparkline plus min/max/last readout.
//! Installed by the controller with the symbol picked in the ticker
//! search; opening a different coin replaces this instance outright.

use std::cell::RefCell;
use std::rc::Rc;

use coinstack_core::event::{Event, KeyCode};
use coinstack_runtime::Cmd;

use crate::app::AppMsg;
use crate::portfolio::prices::PriceEntry;
use crate::portfolio::{PriceBook, Settings};
use crate::theme;
use crate::views::View;

const SPARK_LEVELS: &[char] = &['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// History panel for one symbol.
pub struct CoinHistoryView {
    symbol: String,
    entry: Option<PriceEntry>,
    settings: Rc<RefCell<Settings>>,
}

impl CoinHistoryView {
    /// History for `symbol`; an unknown symbol renders a notice rather
    /// than failing.
    #[must_use]
    pub fn new(symbol: &str, prices: &PriceBook, settings: Rc<RefCell<Settings>>) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            entry: prices.get(symbol).cloned(),
            settings,
        }
    }

    /// Symbol this panel describes.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// Map a price series onto spark levels.
fn sparkline(series: &[f64]) -> String {
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if series.is_empty() || !min.is_finite() || !max.is_finite() {
        return String::new();
    }
    let span = max - min;
    series
        .iter()
        .map(|value| {
            let level = if span <= f64::EPSILON {
                0
            } else {
                (((value - min) / span) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

impl View for CoinHistoryView {
    fn update(&mut self, event: &Event) -> Cmd<AppMsg> {
        match event {
            Event::Key(key) if key.is_press() => match key.code {
                KeyCode::Escape | KeyCode::Char('q') => Cmd::msg(AppMsg::ReturnToMenu),
                _ => Cmd::none(),
            },
            _ => Cmd::none(),
        }
    }

    fn render(&self) -> String {
        let settings = self.settings.borrow();
        let mut lines = Vec::new();

        let Some(entry) = self.entry.as_ref() else {
            lines.push(theme::title(&format!("{} — history", self.symbol)));
            lines.push(theme::muted("no price data for this symbol"));
            return lines.join("\n");
        };

        lines.push(theme::title(&format!(
            "{} ({}) — history",
            entry.symbol, entry.name
        )));
        lines.push(String::new());

        if entry.history.is_empty() {
            lines.push(theme::muted("no recorded history"));
        } else {
            let min = entry.history.iter().copied().fold(f64::INFINITY, f64::min);
            let max = entry
                .history
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let first = entry.history[0];
            let last = *entry.history.last().unwrap_or(&entry.spot);
            let change = if first.abs() > f64::EPSILON {
                (last - first) / first * 100.0
            } else {
                0.0
            };

            lines.push(format!("  {}", theme::value(&sparkline(&entry.history))));
            lines.push(String::new());
            lines.push(format!(
                "low {}   high {}   points {}",
                settings.format_money(min),
                settings.format_money(max),
                entry.history.len()
            ));
            let change_text = format!("{change:+.2}%");
            let styled_change = if change < 0.0 {
                theme::loss(&change_text)
            } else {
                theme::gain(&change_text)
            };
            lines.push(format!(
                "spot {}   over series {styled_change}",
                theme::value(&settings.format_money(entry.spot)),
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Rc<RefCell<Settings>> {
        Rc::new(RefCell::new(Settings::default()))
    }

    #[test]
    fn sparkline_spans_the_value_range() {
        let spark = sparkline(&[1.0, 2.0, 3.0]);
        assert_eq!(spark.chars().count(), 3);
        assert!(spark.starts_with('▁'));
        assert!(spark.ends_with('█'));
    }

    #[test]
    fn flat_series_renders_flat() {
        assert_eq!(sparkline(&[5.0, 5.0, 5.0]), "▁▁▁");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn known_symbol_shows_stats() {
        let view = CoinHistoryView::new("btc", &PriceBook::seeded(), settings());
        let frame = view.render();
        assert!(frame.contains("BTC"));
        assert!(frame.contains("low"));
        assert!(frame.contains("high"));
    }

    #[test]
    fn unknown_symbol_degrades_to_a_notice() {
        let view = CoinHistoryView::new("nope", &PriceBook::seeded(), settings());
        assert_eq!(view.symbol(), "NOPE");
        assert!(view.render().contains("no price data"));
    }

    #[test]
    fn escape_returns_to_menu() {
        use coinstack_core::event::KeyEvent;
        let mut view = CoinHistoryView::new("btc", &PriceBook::seeded(), settings());
        let cmd = view.update(&Event::Key(KeyEvent::new(KeyCode::Escape)));
        assert!(matches!(cmd, Cmd::Msg(AppMsg::ReturnToMenu)));
    }
}
