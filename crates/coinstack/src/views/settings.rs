#![forbid(unsafe_code)]

//! Settings: display currency and fiat precision, persisted on change.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use coinstack_core::event::{Event, KeyCode, KeyEvent};
use coinstack_runtime::Cmd;

use crate::app::AppMsg;
use crate::portfolio::Settings;
use crate::theme;
use crate::views::View;

/// Tunable rows, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Currency,
    Decimals,
}

const ROWS: &[Row] = &[Row::Currency, Row::Decimals];

/// Editor over the shared [`Settings`] value.
pub struct SettingsView {
    settings: Rc<RefCell<Settings>>,
    data_dir: PathBuf,
    cursor: usize,
}

impl SettingsView {
    #[must_use]
    pub fn new(settings: Rc<RefCell<Settings>>, data_dir: PathBuf) -> Self {
        Self {
            settings,
            data_dir,
            cursor: 0,
        }
    }

    fn adjust(&mut self, forward: bool) -> Cmd<AppMsg> {
        {
            let mut settings = self.settings.borrow_mut();
            match ROWS[self.cursor] {
                Row::Currency => {
                    settings.currency = if forward {
                        settings.currency.next()
                    } else {
                        settings.currency.prev()
                    };
                }
                Row::Decimals => {
                    settings.decimals = if forward {
                        (settings.decimals + 1).min(Settings::MAX_DECIMALS)
                    } else {
                        settings.decimals.saturating_sub(1)
                    };
                }
            }
        }
        self.persist()
    }

    fn persist(&self) -> Cmd<AppMsg> {
        let settings = *self.settings.borrow();
        match settings.save(&self.data_dir) {
            Ok(()) => Cmd::msg(AppMsg::Status("settings saved".to_string())),
            Err(e) => Cmd::msg(AppMsg::Error(format!("settings save failed: {e}"))),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Cmd<AppMsg> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                Cmd::none()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1).min(ROWS.len() - 1);
                Cmd::none()
            }
            KeyCode::Left | KeyCode::Char('h') => self.adjust(false),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => self.adjust(true),
            KeyCode::Escape => Cmd::msg(AppMsg::ReturnToMenu),
            _ => Cmd::none(),
        }
    }
}

impl View for SettingsView {
    fn update(&mut self, event: &Event) -> Cmd<AppMsg> {
        match event {
            Event::Key(key) if key.is_press() => self.handle_key(key),
            _ => Cmd::none(),
        }
    }

    fn render(&self) -> String {
        let settings = self.settings.borrow();
        let mut lines = Vec::new();
        lines.push(theme::title("Settings"));
        lines.push(String::new());

        for (idx, row) in ROWS.iter().enumerate() {
            let (label, value) = match row {
                Row::Currency => ("currency", settings.currency.label().to_string()),
                Row::Decimals => ("decimals", settings.decimals.to_string()),
            };
            let line = format!("{label:<10} ◂ {value} ▸");
            if idx == self.cursor {
                lines.push(theme::selected(&line));
            } else {
                lines.push(line);
            }
        }

        lines.push(String::new());
        lines.push(format!(
            "sample: {}",
            theme::value(&settings.format_money(1234.5678))
        ));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Currency;
    use tempfile::TempDir;

    fn view() -> (TempDir, SettingsView, Rc<RefCell<Settings>>) {
        let dir = TempDir::new().unwrap();
        let settings = Rc::new(RefCell::new(Settings::default()));
        let view = SettingsView::new(Rc::clone(&settings), dir.path().to_path_buf());
        (dir, view, settings)
    }

    fn press(view: &mut SettingsView, code: KeyCode) -> Cmd<AppMsg> {
        view.update(&Event::Key(KeyEvent::new(code)))
    }

    #[test]
    fn cycling_currency_persists() {
        let (dir, mut view, settings) = view();
        let cmd = press(&mut view, KeyCode::Right);
        assert!(matches!(cmd, Cmd::Msg(AppMsg::Status(_))));
        assert_eq!(settings.borrow().currency, Currency::Eur);

        // The change is on disk, not just in memory.
        assert_eq!(Settings::load(dir.path()).currency, Currency::Eur);
    }

    #[test]
    fn decimals_are_clamped() {
        let (_dir, mut view, settings) = view();
        press(&mut view, KeyCode::Char('j'));
        for _ in 0..20 {
            press(&mut view, KeyCode::Right);
        }
        assert_eq!(settings.borrow().decimals, Settings::MAX_DECIMALS);
        for _ in 0..20 {
            press(&mut view, KeyCode::Left);
        }
        assert_eq!(settings.borrow().decimals, 0);
    }

    #[test]
    fn escape_returns_to_menu() {
        let (_dir, mut view, _) = view();
        let cmd = press(&mut view, KeyCode::Escape);
        assert!(matches!(cmd, Cmd::Msg(AppMsg::ReturnToMenu)));
    }

    #[test]
    fn render_shows_a_formatted_sample() {
        let (_dir, view, _) = view();
        let frame = view.render();
        assert!(frame.contains("currency"));
        assert!(frame.contains("$1234.57"));
    }
}
