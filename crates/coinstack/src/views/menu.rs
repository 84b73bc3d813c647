#![forbid(unsafe_code)]

//! The navigation menu: initial view and universal fallback.

use coinstack_core::event::{Event, KeyCode};
use coinstack_core::text::center;
use coinstack_runtime::Cmd;

use crate::app::AppMsg;
use crate::theme;
use crate::views::{View, menu_entries};

/// Cursor-driven list of every menu destination.
pub struct MenuView {
    entries: Vec<(&'static str, &'static str)>,
    cursor: usize,
    width: u16,
    height: u16,
}

impl MenuView {
    /// Menu over the configured destinations, cursor on the first.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: menu_entries(),
            cursor: 0,
            width: 0,
            height: 0,
        }
    }

    /// Currently highlighted entry index.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Last terminal size the menu saw (raw, no status-bar adjustment).
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn select(&self) -> Cmd<AppMsg> {
        match self.entries.get(self.cursor) {
            Some((_, action)) => Cmd::msg(AppMsg::MenuSelect((*action).to_string())),
            None => Cmd::none(),
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let len = len as isize;
        self.cursor = ((self.cursor as isize + delta + len) % len) as usize;
    }
}

impl Default for MenuView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for MenuView {
    fn update(&mut self, event: &Event) -> Cmd<AppMsg> {
        match event {
            Event::Resize { width, height } => {
                self.width = *width;
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
                KeyCode::Home => {
                    self.cursor = 0;
                    Cmd::none()
                }
                KeyCode::End => {
                    self.cursor = self.entries.len().saturating_sub(1);
                    Cmd::none()
                }
                KeyCode::Enter => self.select(),
                KeyCode::Char(c @ '1'..='9') => {
                    let idx = (c as usize) - ('1' as usize);
                    if idx < self.entries.len() {
                        self.cursor = idx;
                        return self.select();
                    }
                    Cmd::none()
                }
                _ => Cmd::none(),
            },
            _ => Cmd::none(),
        }
    }

    fn render(&self) -> String {
        let width = self.width as usize;
        let mut lines = Vec::with_capacity(self.entries.len() + 4);

        lines.push(center(&theme::title("· coinstack ·"), width));
        lines.push(center(&theme::muted("terminal portfolio tracker"), width));
        lines.push(String::new());

        for (idx, (title, _)) in self.entries.iter().enumerate() {
            let label = format!("{}. {title}", idx + 1);
            let line = if idx == self.cursor {
                format!("▸ {}", theme::selected(&label))
            } else {
                format!("  {label}")
            };
            lines.push(center(&line, width));
        }

        lines.push(String::new());
        lines.push(center(&theme::muted("enter: open · q: quit"), width));
        lines.join("\n")
    }

    fn content_view(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinstack_core::event::KeyEvent;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code))
    }

    #[test]
    fn cursor_wraps_in_both_directions() {
        let mut menu = MenuView::new();
        let last = menu.entries.len() - 1;

        menu.update(&key(KeyCode::Up));
        assert_eq!(menu.cursor(), last);
        menu.update(&key(KeyCode::Down));
        assert_eq!(menu.cursor(), 0);
        menu.update(&key(KeyCode::Char('j')));
        assert_eq!(menu.cursor(), 1);
    }

    #[test]
    fn enter_selects_the_highlighted_action() {
        let mut menu = MenuView::new();
        menu.update(&key(KeyCode::Down));
        let cmd = menu.update(&key(KeyCode::Enter));
        let expected = menu.entries[1].1;
        match cmd {
            Cmd::Msg(AppMsg::MenuSelect(action)) => assert_eq!(action, expected),
            other => panic!("expected MenuSelect, got {other:?}"),
        }
    }

    #[test]
    fn number_keys_jump_and_select() {
        let mut menu = MenuView::new();
        let cmd = menu.update(&key(KeyCode::Char('3')));
        assert_eq!(menu.cursor(), 2);
        assert!(matches!(cmd, Cmd::Msg(AppMsg::MenuSelect(_))));

        // Out-of-range digits are ignored.
        let cmd = menu.update(&key(KeyCode::Char('9')));
        assert!(cmd.is_none());
    }

    #[test]
    fn resize_stores_the_raw_size() {
        let mut menu = MenuView::new();
        menu.update(&Event::Resize {
            width: 100,
            height: 30,
        });
        assert_eq!(menu.size(), (100, 30));
    }

    #[test]
    fn render_lists_every_destination() {
        let menu = MenuView::new();
        let frame = menu.render();
        for (title, _) in &menu.entries {
            assert!(frame.contains(title), "menu should list {title}");
        }
        assert!(!menu.content_view());
    }
}
