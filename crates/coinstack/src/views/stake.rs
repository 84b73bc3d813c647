#![forbid(unsafe_code)]

//! Staking positions: open stakes with estimated accrued rewards.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use coinstack_core::event::{Event, KeyCode, KeyEvent};
use coinstack_core::text::pad_right;
use coinstack_runtime::Cmd;

use crate::app::AppMsg;
use crate::portfolio::PortfolioStore;
use crate::theme;
use crate::views::View;
use crate::views::input::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Asset,
    Amount,
    Apy,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Asset => Field::Amount,
            Field::Amount => Field::Apy,
            Field::Apy => Field::Asset,
        }
    }
}

#[derive(Debug)]
struct StakeForm {
    focus: Field,
    asset: TextInput,
    amount: TextInput,
    apy: TextInput,
}

impl StakeForm {
    fn new() -> Self {
        Self {
            focus: Field::Asset,
            asset: TextInput::new(),
            amount: TextInput::new(),
            apy: TextInput::new(),
        }
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Asset => &mut self.asset,
            Field::Amount => &mut self.amount,
            Field::Apy => &mut self.apy,
        }
    }
}

/// List of open staking positions with an inline add form.
pub struct StakeView {
    store: Rc<RefCell<PortfolioStore>>,
    cursor: usize,
    height: u16,
    form: Option<StakeForm>,
}

impl StakeView {
    #[must_use]
    pub fn new(store: Rc<RefCell<PortfolioStore>>) -> Self {
        Self {
            store,
            cursor: 0,
            height: 0,
            form: None,
        }
    }

    fn row_count(&self) -> usize {
        self.store.borrow().stakes().len()
    }

    fn browse_key(&mut self, key: &KeyEvent) -> Cmd<AppMsg> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                Cmd::none()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1).min(self.row_count().saturating_sub(1));
                Cmd::none()
            }
            KeyCode::Char('a') => {
                self.form = Some(StakeForm::new());
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
            KeyCode::Enter => {
                let ready = self
                    .form
                    .as_ref()
                    .is_some_and(|form| form.focus == Field::Apy);
                if ready {
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
        let apy = match form.apy.value().trim().parse::<f64>() {
            Ok(v) if v >= 0.0 => v,
            _ => return Cmd::msg(AppMsg::Error("APY must be a number".to_string())),
        };

        let result = self.store.borrow_mut().record_stake(&asset, amount, apy);
        match result {
            Ok(stake) => {
                self.form = None;
                self.cursor = self.row_count().saturating_sub(1);
                Cmd::msg(AppMsg::Status(format!(
                    "staked {} {} at {}% APY",
                    stake.amount, stake.asset, stake.apy
                )))
            }
            Err(e) => Cmd::msg(AppMsg::Error(format!("save failed: {e}"))),
        }
    }

    fn delete_selected(&mut self) -> Cmd<AppMsg> {
        let id = {
            let store = self.store.borrow();
            match store.stakes().get(self.cursor) {
                Some(stake) => stake.id,
                None => return Cmd::none(),
            }
        };
        match self.store.borrow_mut().remove_stake(id) {
            Ok(_) => {
                self.cursor = self.cursor.min(self.row_count().saturating_sub(1));
                Cmd::msg(AppMsg::Status("position closed".to_string()))
            }
            Err(e) => Cmd::msg(AppMsg::Error(format!("delete failed: {e}"))),
        }
    }
}

impl View for StakeView {
    fn update(&mut self, event: &Event) -> Cmd<AppMsg> {
        match event {
            Event::Resize { height, .. } => {
                self.height = *height;
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
        let now = Utc::now();

        let mut lines = Vec::new();
        lines.push(theme::title(&format!(
            "Staking — {} positions",
            store.stakes().len()
        )));

        if let Some(form) = self.form.as_ref() {
            let field = |label: &str, input: &TextInput, f: Field| {
                let marker = if form.focus == f { "▸" } else { " " };
                format!("{marker} {label} {}", input.render(form.focus == f))
            };
            lines.push(theme::header("New staking position"));
            lines.push(field("asset: ", &form.asset, Field::Asset));
            lines.push(field("amount:", &form.amount, Field::Amount));
            lines.push(field("APY %: ", &form.apy, Field::Apy));
            lines.push(theme::muted("tab: next field · enter: save · esc: cancel"));
            return lines.join("\n");
        }

        lines.push(theme::header(&format!(
            "{} {} {} {} {}",
            pad_right("ASSET", 7),
            pad_right("AMOUNT", 12),
            pad_right("APY", 8),
            pad_right("SINCE", 12),
            "ACCRUED"
        )));

        if store.stakes().is_empty() {
            lines.push(theme::muted("nothing staked — press a to add a position"));
        }

        let viewport = (self.height as usize).saturating_sub(3).max(1);
        let start = self.cursor.saturating_sub(viewport - 1);
        for (idx, stake) in store
            .stakes()
            .iter()
            .enumerate()
            .skip(start)
            .take(viewport)
        {
            let accrued = format!("{:.4} {}", stake.accrued(now), stake.asset);
            let line = format!(
                "{} {} {} {} {}",
                pad_right(&stake.asset, 7),
                pad_right(&format!("{:.4}", stake.amount), 12),
                pad_right(&format!("{:.2}%", stake.apy), 8),
                pad_right(&stake.started.format("%Y-%m-%d").to_string(), 12),
                accrued,
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
