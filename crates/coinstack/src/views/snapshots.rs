#![forbid(unsafe_code)]

//! Snapshots: point-in-time valuations of the whole portfolio, with the
//! delta against the previous one.

use std::cell::RefCell;
use std::rc::Rc;

use coinstack_core::event::{Event, KeyCode};
use coinstack_core::text::pad_right;
use coinstack_runtime::Cmd;

use crate::app::AppMsg;
use crate::portfolio::{self, PortfolioStore, PriceBook, Settings};
use crate::theme;
use crate::views::View;

/// Snapshot list plus the take/delete actions.
pub struct SnapshotsView {
    store: Rc<RefCell<PortfolioStore>>,
    prices: Rc<PriceBook>,
    settings: Rc<RefCell<Settings>>,
    cursor: usize,
    height: u16,
}

impl SnapshotsView {
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
            cursor: 0,
            height: 0,
        }
    }

    fn row_count(&self) -> usize {
        self.store.borrow().snapshots().len()
    }

    fn take_snapshot(&mut self) -> Cmd<AppMsg> {
        let total = {
            let store = self.store.borrow();
            portfolio::total_value(&store, &self.prices)
        };
        let result = self.store.borrow_mut().record_snapshot(total);
        match result {
            Ok(snapshot) => {
                self.cursor = self.row_count().saturating_sub(1);
                let money = self.settings.borrow().format_money(snapshot.total_value);
                Cmd::msg(AppMsg::Status(format!("snapshot taken: {money}")))
            }
            Err(e) => Cmd::msg(AppMsg::Error(format!("snapshot failed: {e}"))),
        }
    }

    fn delete_selected(&mut self) -> Cmd<AppMsg> {
        let id = {
            let store = self.store.borrow();
            match store.snapshots().get(self.cursor) {
                Some(snapshot) => snapshot.id,
                None => return Cmd::none(),
            }
        };
        match self.store.borrow_mut().remove_snapshot(id) {
            Ok(_) => {
                self.cursor = self.cursor.min(self.row_count().saturating_sub(1));
                Cmd::msg(AppMsg::Status("snapshot deleted".to_string()))
            }
            Err(e) => Cmd::msg(AppMsg::Error(format!("delete failed: {e}"))),
        }
    }
}

impl View for SnapshotsView {
    fn update(&mut self, event: &Event) -> Cmd<AppMsg> {
        match event {
            Event::Resize { height, .. } => {
                self.height = *height;
                Cmd::none()
            }
            Event::Key(key) if key.is_press() => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.cursor = self.cursor.saturating_sub(1);
                    Cmd::none()
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.cursor = (self.cursor + 1).min(self.row_count().saturating_sub(1));
                    Cmd::none()
                }
                KeyCode::Char('s') => self.take_snapshot(),
                KeyCode::Char('d') => self.delete_selected(),
                KeyCode::Escape => Cmd::msg(AppMsg::ReturnToMenu),
                _ => Cmd::none(),
            },
            _ => Cmd::none(),
        }
    }

    fn render(&self) -> String {
        let store = self.store.borrow();
        let settings = self.settings.borrow();
        let snapshots = store.snapshots();

        let mut lines = Vec::new();
        lines.push(theme::title(&format!(
            "Snapshots — {} recorded",
            snapshots.len()
        )));
        lines.push(theme::header(&format!(
            "{} {} {}",
            pad_right("TAKEN", 18),
            pad_right("TOTAL", 16),
            "DELTA"
        )));

        if snapshots.is_empty() {
            lines.push(theme::muted("press s to capture the current valuation"));
        }

        let viewport = (self.height as usize).saturating_sub(3).max(1);
        let start = self.cursor.saturating_sub(viewport - 1);
        for (idx, snapshot) in snapshots.iter().enumerate().skip(start).take(viewport) {
            let delta = if idx == 0 {
                theme::muted("—")
            } else {
                let diff = snapshot.total_value - snapshots[idx - 1].total_value;
                let text = settings.format_money(diff.abs());
                if diff < 0.0 {
                    theme::loss(&format!("-{text}"))
                } else {
                    theme::gain(&format!("+{text}"))
                }
            };
            let line = format!(
                "{} {} {}",
                pad_right(&snapshot.taken.format("%Y-%m-%d %H:%M").to_string(), 18),
                pad_right(&settings.format_money(snapshot.total_value), 16),
                delta,
            );
            if idx == self.cursor {
                lines.push(theme::selected(&line));
            } else {
                lines.push(line);
            }
        }

        lines.join("\n")
    }
}
