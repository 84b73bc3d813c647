#![forbid(unsafe_code)]

//! Outstanding loans: principal, rate, counterparty, accrued interest.

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
    Principal,
    Rate,
    Counterparty,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Asset => Field::Principal,
            Field::Principal => Field::Rate,
            Field::Rate => Field::Counterparty,
            Field::Counterparty => Field::Asset,
        }
    }
}

#[derive(Debug)]
struct LoanForm {
    focus: Field,
    asset: TextInput,
    principal: TextInput,
    rate: TextInput,
    counterparty: TextInput,
}

impl LoanForm {
    fn new() -> Self {
        Self {
            focus: Field::Asset,
            asset: TextInput::new(),
            principal: TextInput::new(),
            rate: TextInput::new(),
            counterparty: TextInput::new(),
        }
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Asset => &mut self.asset,
            Field::Principal => &mut self.principal,
            Field::Rate => &mut self.rate,
            Field::Counterparty => &mut self.counterparty,
        }
    }
}

/// Loan book with an inline add form.
pub struct LoanView {
    store: Rc<RefCell<PortfolioStore>>,
    cursor: usize,
    height: u16,
    form: Option<LoanForm>,
}

impl LoanView {
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
        self.store.borrow().loans().len()
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
                self.form = Some(LoanForm::new());
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
                    .is_some_and(|form| form.focus == Field::Counterparty);
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
        let principal = match form.principal.value().trim().parse::<f64>() {
            Ok(v) if v > 0.0 => v,
            _ => {
                return Cmd::msg(AppMsg::Error(
                    "principal must be a positive number".to_string(),
                ));
            }
        };
        let rate = match form.rate.value().trim().parse::<f64>() {
            Ok(v) if v >= 0.0 => v,
            _ => return Cmd::msg(AppMsg::Error("rate must be a number".to_string())),
        };
        let counterparty = form.counterparty.value().trim().to_string();
        if counterparty.is_empty() {
            return Cmd::msg(AppMsg::Error("counterparty is required".to_string()));
        }

        let result = self
            .store
            .borrow_mut()
            .record_loan(&asset, principal, rate, &counterparty);
        match result {
            Ok(loan) => {
                self.form = None;
                self.cursor = self.row_count().saturating_sub(1);
                Cmd::msg(AppMsg::Status(format!(
                    "loan of {} {} from {} recorded",
                    loan.principal, loan.asset, loan.counterparty
                )))
            }
            Err(e) => Cmd::msg(AppMsg::Error(format!("save failed: {e}"))),
        }
    }

    fn delete_selected(&mut self) -> Cmd<AppMsg> {
        let id = {
            let store = self.store.borrow();
            match store.loans().get(self.cursor) {
                Some(loan) => loan.id,
                None => return Cmd::none(),
            }
        };
        match self.store.borrow_mut().remove_loan(id) {
            Ok(_) => {
                self.cursor = self.cursor.min(self.row_count().saturating_sub(1));
                Cmd::msg(AppMsg::Status("loan closed".to_string()))
            }
            Err(e) => Cmd::msg(AppMsg::Error(format!("delete failed: {e}"))),
        }
    }
}

impl View for LoanView {
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
        lines.push(theme::title(&format!("Loans — {} open", store.loans().len())));

        if let Some(form) = self.form.as_ref() {
            let field = |label: &str, input: &TextInput, f: Field| {
                let marker = if form.focus == f { "▸" } else { " " };
                format!("{marker} {label} {}", input.render(form.focus == f))
            };
            lines.push(theme::header("New loan"));
            lines.push(field("asset:       ", &form.asset, Field::Asset));
            lines.push(field("principal:   ", &form.principal, Field::Principal));
            lines.push(field("rate %:      ", &form.rate, Field::Rate));
            lines.push(field("counterparty:", &form.counterparty, Field::Counterparty));
            lines.push(theme::muted("tab: next field · enter: save · esc: cancel"));
            return lines.join("\n");
        }

        lines.push(theme::header(&format!(
            "{} {} {} {} {}",
            pad_right("ASSET", 7),
            pad_right("PRINCIPAL", 14),
            pad_right("RATE", 8),
            pad_right("COUNTERPARTY", 16),
            "INTEREST"
        )));

        if store.loans().is_empty() {
            lines.push(theme::muted("no open loans — press a to record one"));
        }

        let viewport = (self.height as usize).saturating_sub(3).max(1);
        let start = self.cursor.saturating_sub(viewport - 1);
        for (idx, loan) in store
            .loans()
            .iter()
            .enumerate()
            .skip(start)
            .take(viewport)
        {
            let interest = format!("{:.4} {}", loan.accrued_interest(now), loan.asset);
            let line = format!(
                "{} {} {} {} {}",
                pad_right(&loan.asset, 7),
                pad_right(&format!("{:.4}", loan.principal), 14),
                pad_right(&format!("{:.2}%", loan.rate), 8),
                pad_right(&loan.counterparty, 16),
                interest,
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
