#![forbid(unsafe_code)]

//! Ticker search: incremental filter over the price book; Enter opens
//! the selected coin's history.

use std::cell::RefCell;
use std::rc::Rc;

use coinstack_core::event::{Event, KeyCode, KeyEvent};
use coinstack_core::text::pad_right;
use coinstack_runtime::Cmd;

use crate::app::AppMsg;
use crate::portfolio::{PriceBook, Settings};
use crate::theme;
use crate::views::View;
use crate::views::input::TextInput;

/// Rows consumed by the title and the search field.
const CHROME_ROWS: usize = 3;

/// Incremental search over the known symbols.
pub struct TickerView {
    prices: Rc<PriceBook>,
    settings: Rc<RefCell<Settings>>,
    query: TextInput,
    cursor: usize,
    height: u16,
}

impl TickerView {
    #[must_use]
    pub fn new(prices: Rc<PriceBook>, settings: Rc<RefCell<Settings>>) -> Self {
        Self {
            prices,
            settings,
            query: TextInput::new(),
            cursor: 0,
            height: 0,
        }
    }

    fn matches(&self) -> Vec<&crate::portfolio::prices::PriceEntry> {
        self.prices.search(self.query.value())
    }

    fn clamp_cursor(&mut self) {
        let count = self.matches().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Cmd<AppMsg> {
        match key.code {
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                Cmd::none()
            }
            KeyCode::Down => {
                let count = self.matches().len();
                self.cursor = (self.cursor + 1).min(count.saturating_sub(1));
                Cmd::none()
            }
            KeyCode::Enter => match self.matches().get(self.cursor) {
                Some(entry) => Cmd::msg(AppMsg::OpenCoinHistory(entry.symbol.clone())),
                None => Cmd::none(),
            },
            KeyCode::Escape => {
                if self.query.is_empty() {
                    Cmd::msg(AppMsg::ReturnToMenu)
                } else {
                    self.query.clear();
                    self.cursor = 0;
                    Cmd::none()
                }
            }
            _ => {
                if self.query.handle_key(key) {
                    self.cursor = 0;
                }
                Cmd::none()
            }
        }
    }
}

impl View for TickerView {
    fn update(&mut self, event: &Event) -> Cmd<AppMsg> {
        match event {
            Event::Resize { height, .. } => {
                self.height = *height;
                Cmd::none()
            }
            Event::Paste(paste) => {
                self.query.handle_paste(&paste.text);
                self.cursor = 0;
                Cmd::none()
            }
            Event::Key(key) if key.is_press() => {
                let cmd = self.handle_key(key);
                self.clamp_cursor();
                cmd
            }
            _ => Cmd::none(),
        }
    }

    fn render(&self) -> String {
        let settings = self.settings.borrow();
        let matches = self.matches();

        let mut lines = Vec::new();
        lines.push(theme::title("Ticker Search"));
        lines.push(format!("search: {}", self.query.render(true)));

        if matches.is_empty() {
            lines.push(theme::muted("no matching symbols"));
            return lines.join("\n");
        }

        let viewport = (self.height as usize).saturating_sub(CHROME_ROWS).max(1);
        for (idx, entry) in matches.iter().enumerate().take(viewport) {
            let line = format!(
                "{} {} {}",
                pad_right(&entry.symbol, 7),
                pad_right(&entry.name, 16),
                settings.format_money(entry.spot),
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
