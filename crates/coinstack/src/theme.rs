#![forbid(unsafe_code)]

//! Semantic text styles for the application.
//!
//! Views never pick raw colors; they ask for a role (title, selection,
//! gain, loss, …) and get back a styled string. Keeping the palette here
//! means the render path stays testable: tests match on payload text and
//! the styling is injected at exactly one layer.

use crossterm::style::Stylize;

/// Application title / branding accent.
#[must_use]
pub fn title(s: &str) -> String {
    format!("{}", s.bold().cyan())
}

/// Section or table header.
#[must_use]
pub fn header(s: &str) -> String {
    format!("{}", s.bold())
}

/// The selected row or menu entry.
#[must_use]
pub fn selected(s: &str) -> String {
    format!("{}", s.black().on_cyan())
}

/// De-emphasized text: hints, separators, placeholders.
#[must_use]
pub fn muted(s: &str) -> String {
    format!("{}", s.dark_grey())
}

/// Transient status message in the status bar.
#[must_use]
pub fn status(s: &str) -> String {
    format!("{}", s.green())
}

/// Error text; overrides status in the status bar.
#[must_use]
pub fn error(s: &str) -> String {
    format!("{}", s.white().on_dark_red())
}

/// Positive deltas (unrealized gains, price up).
#[must_use]
pub fn gain(s: &str) -> String {
    format!("{}", s.green())
}

/// Negative deltas (losses, price down).
#[must_use]
pub fn loss(s: &str) -> String {
    format!("{}", s.red())
}

/// Highlighted value (amounts, totals).
#[must_use]
pub fn value(s: &str) -> String {
    format!("{}", s.yellow())
}

/// Focused input field marker.
#[must_use]
pub fn input_focused(s: &str) -> String {
    format!("{}", s.black().on_white())
}
