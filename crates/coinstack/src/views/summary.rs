#![forbid(unsafe_code)]

//! Portfolio summary: per-asset positions, valuations, and unrealized
//! P/L. The controller evicts this view on the way out so that the next
//! visit recomputes against whatever the other views changed.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use coinstack_core::event::{Event, KeyCode};
use coinstack_core::text::pad_right;
use coinstack_runtime::Cmd;
use tracing::debug;

use crate::app::AppMsg;
use crate::portfolio::{self, AssetSummary, PortfolioStore, PriceBook, Settings};
use crate::theme;
use crate::views::View;

/// Rows consumed by the title, column header, and totals block.
const CHROME_ROWS: usize = 6;

/// Aggregated, read-only portfolio overview.
pub struct SummaryView {
    store: Rc<RefCell<PortfolioStore>>,
    prices: Rc<PriceBook>,
    settings: Rc<RefCell<Settings>>,
    rows: Vec<AssetSummary>,
    staked_total: f64,
    loan_interest: f64,
    cursor: usize,
    scroll: usize,
    height: u16,
}

impl SummaryView {
    /// Empty summary; [`View::init`] performs the first aggregation.
    #[must_use]
    pub fn new(
        store: Rc<RefCell<PortfolioStore>>,
        prices: Rc<PriceBook>,
        settings: Rc<RefCell<Settings>>,
    ) -> Self {
        Self {
            store,
            prices,
            settings,
            rows: Vec::new(),
            staked_total: 0.0,
            loan_interest: 0.0,
            cursor: 0,
            scroll: 0,
            height: 0,
        }
    }

    /// Asset rows currently displayed.
    #[must_use]
    pub fn rows(&self) -> &[AssetSummary] {
        &self.rows
    }

    fn recompute(&mut self) {
        let store = self.store.borrow();
        let now = Utc::now();
        self.rows = portfolio::summarize(&store, &self.prices);
        self.staked_total = store
            .stakes()
            .iter()
            .filter_map(|p| self.prices.spot(&p.asset).map(|spot| p.amount * spot))
            .sum();
        self.loan_interest = store
            .loans()
            .iter()
            .map(|l| l.accrued_interest(now))
            .sum();
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
        debug!(assets = self.rows.len(), "summary recomputed");
    }

    fn viewport(&self) -> usize {
        (self.height as usize).saturating_sub(CHROME_ROWS).max(1)
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let max = (self.rows.len() - 1) as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
        let viewport = self.viewport();
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }
        if self.cursor >= self.scroll + viewport {
            self.scroll = self.cursor + 1 - viewport;
        }
    }

    fn signed_money(&self, value: f64) -> String {
        let settings = self.settings.borrow();
        let text = settings.format_money(value.abs());
        if value < 0.0 {
            theme::loss(&format!("-{text}"))
        } else {
            theme::gain(&format!("+{text}"))
        }
    }
}

impl View for SummaryView {
    fn init(&mut self) -> Cmd<AppMsg> {
        self.recompute();
        Cmd::none()
    }

    fn update(&mut self, event: &Event) -> Cmd<AppMsg> {
        match event {
            Event::Resize { height, .. } => {
                self.height = *height;
                Cmd::none()
            }
            Event::Key(key) if key.is_press() => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_cursor(-1);
                    Cmd::none()
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_cursor(1);
                    Cmd::none()
                }
                KeyCode::Char('r') => {
                    self.recompute();
                    Cmd::msg(AppMsg::Status("summary refreshed".to_string()))
                }
                KeyCode::Escape => Cmd::msg(AppMsg::ReturnToMenu),
                _ => Cmd::none(),
            },
            _ => Cmd::none(),
        }
    }

    fn render(&self) -> String {
        let settings = self.settings.borrow();
        let mut lines = Vec::new();

        lines.push(theme::title("Portfolio Summary"));
        lines.push(theme::header(&format!(
            "{} {} {} {} {}",
            pad_right("ASSET", 7),
            pad_right("NET", 12),
            pad_right("INVESTED", 14),
            pad_right("VALUE", 14),
            "P/L"
        )));

        if self.rows.is_empty() {
            lines.push(theme::muted("no positions — record some trades first"));
        }

        let end = (self.scroll + self.viewport()).min(self.rows.len());
        for (idx, row) in self.rows.iter().enumerate().take(end).skip(self.scroll) {
            let value = match row.market_value {
                Some(v) => settings.format_money(v),
                None => "?".to_string(),
            };
            let pl = match row.unrealized {
                Some(v) => self.signed_money(v),
                None => theme::muted("unpriced"),
            };
            let line = format!(
                "{} {} {} {} {}",
                pad_right(&row.asset, 7),
                pad_right(&format!("{:.4}", row.net_amount), 12),
                pad_right(&settings.format_money(row.invested), 14),
                pad_right(&value, 14),
                pl,
            );
            if idx == self.cursor {
                lines.push(theme::selected(&line));
            } else {
                lines.push(line);
            }
        }

        let priced: f64 = self.rows.iter().filter_map(|r| r.market_value).sum();
        lines.push(String::new());
        lines.push(format!(
            "ledger value {}   staked {}   loan interest {}",
            theme::value(&settings.format_money(priced)),
            theme::value(&settings.format_money(self.staked_total)),
            theme::value(&settings.format_money(self.loan_interest)),
        ));
        lines.push(format!(
            "total {}",
            theme::value(&settings.format_money(priced + self.staked_total))
        ));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::TradeSide;
    use coinstack_core::event::KeyEvent;
    use tempfile::TempDir;

    fn view_with_data() -> (TempDir, SummaryView) {
        let dir = TempDir::new().unwrap();
        let store = Rc::new(RefCell::new(PortfolioStore::open(dir.path()).unwrap()));
        store
            .borrow_mut()
            .record_trade(TradeSide::Buy, "BTC", 2.0, 30_000.0)
            .unwrap();
        store
            .borrow_mut()
            .record_trade(TradeSide::Sell, "BTC", 1.0, 35_000.0)
            .unwrap();
        let summary = SummaryView::new(
            store,
            Rc::new(PriceBook::seeded()),
            Rc::new(RefCell::new(Settings::default())),
        );
        (dir, summary)
    }

    #[test]
    fn init_aggregates_the_store() {
        let (_dir, mut summary) = view_with_data();
        assert!(summary.rows().is_empty());
        summary.init();
        assert_eq!(summary.rows().len(), 1);
        assert_eq!(summary.rows()[0].asset, "BTC");
        assert!((summary.rows()[0].net_amount - 1.0).abs() < 1e-9);
    }

    #[test]
    fn render_shows_positions_and_totals() {
        let (_dir, mut summary) = view_with_data();
        summary.init();
        let frame = summary.render();
        assert!(frame.contains("BTC"));
        assert!(frame.contains("total"));
    }

    #[test]
    fn escape_returns_to_menu() {
        let (_dir, mut summary) = view_with_data();
        summary.init();
        let cmd = summary.update(&Event::Key(KeyEvent::new(KeyCode::Escape)));
        assert!(matches!(cmd, Cmd::Msg(AppMsg::ReturnToMenu)));
    }

    #[test]
    fn manual_refresh_reports_status() {
        let (_dir, mut summary) = view_with_data();
        summary.init();
        let cmd = summary.update(&Event::Key(KeyEvent::new(KeyCode::Char('r'))));
        assert!(matches!(cmd, Cmd::Msg(AppMsg::Status(_))));
    }
}
