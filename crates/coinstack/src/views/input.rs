#![forbid(unsafe_code)]

//! Single-line text input shared by the add-forms and the ticker search.

use coinstack_core::event::{KeyCode, KeyEvent};

use crate::theme;

/// A one-line editable field with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters, 0..=len.
    cursor: usize,
}

impl TextInput {
    /// Empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True when nothing has been typed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Reset to empty.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply a key. Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.ctrl() && !key.alt() => {
                self.insert(c);
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_at(self.cursor);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.char_len() {
                    self.remove_at(self.cursor);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                true
            }
            _ => false,
        }
    }

    /// Insert pasted text at the cursor, dropping control characters.
    pub fn handle_paste(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.insert(c);
        }
    }

    /// Render the field; the focused variant shows a block cursor.
    #[must_use]
    pub fn render(&self, focused: bool) -> String {
        if !focused {
            return self.value.clone();
        }
        let byte = self.byte_at(self.cursor);
        let (before, rest) = self.value.split_at(byte);
        match rest.chars().next() {
            Some(c) => {
                let after: String = rest.chars().skip(1).collect();
                format!(
                    "{before}{}{after}",
                    theme::input_focused(&c.to_string())
                )
            }
            None => format!("{before}{}", theme::input_focused(" ")),
        }
    }

    fn insert(&mut self, c: char) {
        let byte = self.byte_at(self.cursor);
        self.value.insert(byte, c);
        self.cursor += 1;
    }

    fn remove_at(&mut self, char_idx: usize) {
        let byte = self.byte_at(char_idx);
        self.value.remove(byte);
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(b, _)| b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut TextInput, code: KeyCode) {
        input.handle_key(&KeyEvent::new(code));
    }

    fn type_str(input: &mut TextInput, s: &str) {
        for c in s.chars() {
            press(input, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut input = TextInput::new();
        type_str(&mut input, "btc");
        assert_eq!(input.value(), "btc");
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Char('x'));
        assert_eq!(input.value(), "btxc");
    }

    #[test]
    fn backspace_and_delete_edit_around_cursor() {
        let mut input = TextInput::new();
        type_str(&mut input, "0.55");
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "0.5");
        press(&mut input, KeyCode::Home);
        press(&mut input, KeyCode::Delete);
        assert_eq!(input.value(), ".5");
    }

    #[test]
    fn ctrl_chords_are_not_consumed() {
        use coinstack_core::event::Modifiers;
        let mut input = TextInput::new();
        let chord = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(!input.handle_key(&chord));
        assert!(input.is_empty());
    }

    #[test]
    fn paste_strips_control_characters() {
        let mut input = TextInput::new();
        input.handle_paste("BT\nC");
        assert_eq!(input.value(), "BTC");
    }

    #[test]
    fn render_marks_cursor_only_when_focused() {
        let mut input = TextInput::new();
        type_str(&mut input, "eth");
        assert_eq!(input.render(false), "eth");
        assert!(input.render(true).contains("eth"));
        assert_ne!(input.render(true), "eth");
    }
}
