#![forbid(unsafe_code)]

//! Trade ledgers. One view type serves both sides of the book; the
//! controller installs it once for buys and once for sells.

use std::cell::RefCell;
use std::rc::Rc;

use coinstack_core::event::{Event, KeyCode, KeyEvent};
use coinstack_core::text::pad_right;
use coinstack_runtime::Cmd;

use crate::app::AppMsg;
use crate::portfolio::{PortfolioStore, Settings, TradeSide};
use crate::theme;
use crate::views::View;
use crate::views::input::TextInput;

/// Rows consumed by the title, column header, and footer.
const CHROME_ROWS: usize = 4;

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Asset,
    Amount,
    Price,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Asset => Field::Amount,
            Field::Amount => Field::Price,
            Field::Price => Field::Asset,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Asset => Field::Price,
            Field::Amount => Field::Asset,
            Field::Price => Field::Amount,
        }
    }
}

/// Inline add-entry form.
#[derive(Debug)]
struct AddForm {
    focus: Field,
    asset: TextInput,
    amount: TextInput,
    price: TextInput,
}

impl AddForm {
    fn new() -> Self {
        Self {
            focus: Field::Asset,
            asset: TextInput::new(),
            amount: TextInput::new(),
            price: TextInput::new(),
        }
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Asset => &mut self.asset,
            Field::Amount => &mut self.amount,
            Field::Price => &mut self.price,
        }
    }
}

/// Scrollable trade table with an inline add form.
pub struct LedgerView {
    side: TradeSide,
    store: Rc<RefCell<PortfolioStore>>,
    settings: Rc<RefCell<Settings>>,
    cursor: usize,
    scroll: usize,
    height: u16,
    form: Option<AddForm>,
}

impl LedgerView {
    /// Ledger over one side of the book.
    #[must_use]
    pub fn new(
        side: TradeSide,
        store: Rc<RefCell<PortfolioStore>>,
        settings: Rc<RefCell<Settings>>,
    ) -> Self {
        Self {
            side,
            store,
            settings,
            cursor: 0,
            scroll: 0,
            height: 0,
            form: None,
        }
    }

    fn row_count(&self) -> usize {
        self.store.borrow().trades(self.side).len()
    }

    fn viewport(&self) -> usize {
        (self.height as usize).saturating_sub(CHROME_ROWS).max(1)
    }

    fn clamp_cursor(&mut self) {
        let rows = self.row_count();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
        self.ensure_visible();
    }

    fn ensure_visible(&mut self) {
        let viewport = self.viewport();
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }
        if self.cursor >= self.scroll + viewport {
            self.scroll = self.cursor + 1 - viewport;
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let rows = self.row_count();
        if rows == 0 {
            return;
        }
        let max = (rows - 1) as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
        self.ensure_visible();
    }

    fn browse_key(&mut self, key: &KeyEvent) -> Cmd<AppMsg> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(-1);
                Cmd::none()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(1);
                Cmd::none()
            }
            KeyCode::PageUp => {
                self.move_cursor(-(self.viewport() as isize));
                Cmd::none()
            }
            KeyCode::PageDown => {
                self.move_cursor(self.viewport() as isize);
                Cmd::none()
            }
            KeyCode::Home => {
                self.cursor = 0;
                self.ensure_visible();
                Cmd::none()
            }
            KeyCode::End => {
                self.cursor = self.row_count().saturating_sub(1);
                self.ensure_visible();
                Cmd::none()
            }
            KeyCode::Char('a') => {
                self.form = Some(AddForm::new());
                Cmd::none()
            }
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Escape => Cmd::msg(AppMsg::ReturnToMenu),
            _ => Cmd::none(),
        }
    }

    fn form_key(&mut self, key: &KeyEvent) -> Cmd<AppMsg> {
        match key.code {
            KeyCode::Escape => {
                self.form = None;
                Cmd::none()
            }
            KeyCode::Tab => {
                if let Some(form) = self.form.as_mut() {
                    form.focus = form.focus.next();
                }
                Cmd::none()
            }
            KeyCode::BackTab => {
                if let Some(form) = self.form.as_mut() {
                    form.focus = form.focus.prev();
                }
                Cmd::none()
            }
            KeyCode::Enter => {
                let on_last_field = self
                    .form
                    .as_ref()
                    .is_some_and(|form| form.focus == Field::Price);
                if on_last_field {
                    self.commit_form()
                } else {
                    if let Some(form) = self.form.as_mut() {
                        form.focus = form.focus.next();
                    }
                    Cmd::none()
                }
            }
            _ => {
                if let Some(form) = self.form.as_mut() {
                    form.focused_input().handle_key(key);
                }
                Cmd::none()
            }
        }
    }

    fn commit_form(&mut self) -> Cmd<AppMsg> {
        let Some(form) = self.form.as_ref() else {
            return Cmd::none();
        };

        let asset = form.asset.value().trim().to_string();
        if asset.is_empty() {
            return Cmd::msg(AppMsg::Error("asset symbol is required".to_string()));
        }
        let amount = match form.amount.value().trim().parse::<f64>() {
            Ok(v) if v > 0.0 => v,
            _ => {
                return Cmd::msg(AppMsg::Error(
                    "amount must be a positive number".to_string(),
                ));
            }
        };
        let unit_price = match form.price.value().trim().parse::<f64>() {
            Ok(v) if v >= 0.0 => v,
            _ => return Cmd::msg(AppMsg::Error("price must be a number".to_string())),
        };

        let recorded =
            self.store
                .borrow_mut()
                .record_trade(self.side, &asset, amount, unit_price);
        match recorded {
            Ok(trade) => {
                self.form = None;
                self.cursor = self.row_count().saturating_sub(1);
                self.ensure_visible();
                let money = self.settings.borrow().format_money(trade.total());
                Cmd::msg(AppMsg::Status(format!(
                    "{} {} {} for {money}",
                    trade.side.verb(),
                    trade.amount,
                    trade.asset
                )))
            }
            Err(e) => Cmd::msg(AppMsg::Error(format!("save failed: {e}"))),
        }
    }

    fn delete_selected(&mut self) -> Cmd<AppMsg> {
        let id = {
            let store = self.store.borrow();
            let rows = store.trades(self.side);
            match rows.get(self.cursor) {
                Some(trade) => trade.id,
                None => return Cmd::none(),
            }
        };
        let result = self.store.borrow_mut().remove_trade(id);
        match result {
            Ok(_) => {
                self.clamp_cursor();
                Cmd::msg(AppMsg::Status("entry deleted".to_string()))
            }
            Err(e) => Cmd::msg(AppMsg::Error(format!("delete failed: {e}"))),
        }
    }

    fn render_form(&self, form: &AddForm, lines: &mut Vec<String>) {
        let field = |label: &str, input: &TextInput, field: Field| {
            let marker = if form.focus == field { "▸" } else { " " };
            format!("{marker} {label} {}", input.render(form.focus == field))
        };
        lines.push(theme::header(&format!("New {} entry", self.side.label().to_lowercase())));
        lines.push(field("asset: ", &form.asset, Field::Asset));
        lines.push(field("amount:", &form.amount, Field::Amount));
        lines.push(field("price: ", &form.price, Field::Price));
        lines.push(theme::muted(
            "tab: next field · enter: save · esc: cancel",
        ));
    }
}

impl View for LedgerView {
    fn update(&mut self, event: &Event) -> Cmd<AppMsg> {
        match event {
            Event::Resize { height, .. } => {
                self.height = *height;
                self.ensure_visible();
                Cmd::none()
            }
            Event::Paste(paste) => {
                if let Some(form) = self.form.as_mut() {
                    form.focused_input().handle_paste(&paste.text);
                }
                Cmd::none()
            }
            Event::Key(key) if key.is_press() => {
                if self.form.is_some() {
                    self.form_key(key)
                } else {
                    self.browse_key(key)
                }
            }
            _ => Cmd::none(),
        }
    }

    fn render(&self) -> String {
        let store = self.store.borrow();
        let settings = self.settings.borrow();
        let rows = store.trades(self.side);

        let mut lines = Vec::new();
        lines.push(theme::title(&format!(
            "{} Ledger — {} entries",
            self.side.label(),
            rows.len()
        )));

        if let Some(form) = self.form.as_ref() {
            self.render_form(form, &mut lines);
            return lines.join("\n");
        }

        lines.push(theme::header(&format!(
            "{} {} {} {} {}",
            pad_right("DATE", 12),
            pad_right("ASSET", 7),
            pad_right("AMOUNT", 14),
            pad_right("PRICE", 14),
            "TOTAL"
        )));

        if rows.is_empty() {
            lines.push(theme::muted("no entries yet — press a to add one"));
        }

        let end = (self.scroll + self.viewport()).min(rows.len());
        for (idx, trade) in rows.iter().enumerate().take(end).skip(self.scroll) {
            let line = format!(
                "{} {} {} {} {}",
                pad_right(&trade.timestamp.format("%Y-%m-%d").to_string(), 12),
                pad_right(&trade.asset, 7),
                pad_right(&format!("{:.4}", trade.amount), 14),
                pad_right(&settings.format_money(trade.unit_price), 14),
                settings.format_money(trade.total()),
            );
            if idx == self.cursor {
                lines.push(theme::selected(&line));
            } else {
                lines.push(line);
            }
        }

        if !rows.is_empty() {
            lines.push(theme::muted(&format!(
                "{} of {}",
                self.cursor + 1,
                rows.len()
            )));
        }

        lines.join("\n")
    }
}
