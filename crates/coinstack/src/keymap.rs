#![forbid(unsafe_code)]

//! Global key bindings and help metadata.
//!
//! The declarative table drives the menu's footer hints; the predicate
//! functions are what the controller actually matches against, so the
//! two cannot drift apart without a test noticing.

use coinstack_core::event::{KeyEvent, Modifiers};

use crate::views::{ViewId, view_meta};

/// A single global binding, for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    /// Human-readable key chord.
    pub keys: &'static str,
    /// What the chord does.
    pub action: &'static str,
}

/// Bindings handled by the controller itself, before any view sees the
/// key.
pub const GLOBAL_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        keys: "ctrl+c",
        action: "quit from anywhere",
    },
    KeyBinding {
        keys: "q",
        action: "quit (menu only)",
    },
    KeyBinding {
        keys: "esc",
        action: "back to menu",
    },
];

/// Help text used when a view configures none.
pub const DEFAULT_HELP: &str = "esc: menu · ctrl+c: quit";

/// Status-bar help text for a view.
#[must_use]
pub fn help_for(id: ViewId) -> &'static str {
    let help = view_meta(id).help;
    if help.is_empty() { DEFAULT_HELP } else { help }
}

/// The force-quit chord, honored in every state.
#[must_use]
pub fn is_force_quit(key: &KeyEvent) -> bool {
    key.ctrl() && key.is_char('c')
}

/// The menu-only quit shortcut.
#[must_use]
pub fn is_menu_quit(key: &KeyEvent) -> bool {
    key.is_char('q') && key.modifiers == Modifiers::NONE
}
