#![forbid(unsafe_code)]

//! Shared UI chrome: the status bar, the coming-soon box, and the frame
//! composition helpers that wrap view content.

use coinstack_core::text::{center, center_vertical, display_width, pad_right, truncate_plain};

use crate::theme;

/// Branding string shown in the status bar when no status or error is
/// active.
pub const BRAND: &str = concat!("coinstack v", env!("CARGO_PKG_VERSION"));

/// What the status bar should display.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLine<'a> {
    /// Sticky error text; overrides `status` when present.
    pub error: Option<&'a str>,
    /// Transient status message.
    pub status: Option<&'a str>,
    /// Right-hand contextual help for the active view.
    pub help: &'a str,
}

/// Render the one-line status bar.
///
/// Left segment: error, else status, else branding. Right segment: help.
/// At least one column of padding separates the two; when the terminal is
/// too narrow for both, the right segment is dropped and the left one is
/// truncated.
#[must_use]
pub fn status_bar(line: &StatusLine<'_>, width: u16) -> String {
    let width = width as usize;

    let (left_plain, left_styled) = match (line.error, line.status) {
        (Some(err), _) => (err.to_string(), theme::error(err)),
        (None, Some(msg)) => (msg.to_string(), theme::status(msg)),
        (None, None) => (BRAND.to_string(), theme::muted(BRAND)),
    };

    let left_width = display_width(&left_plain);
    let help_width = display_width(line.help);

    if left_width + 1 + help_width <= width {
        let pad = width - left_width - help_width;
        let mut out = left_styled;
        for _ in 0..pad {
            out.push(' ');
        }
        out.push_str(&theme::muted(line.help));
        return out;
    }

    // Narrow terminal: left segment only.
    let clipped = truncate_plain(&left_plain, width);
    let styled = match (line.error, line.status) {
        (Some(_), _) => theme::error(&clipped),
        (None, Some(_)) => theme::status(&clipped),
        (None, None) => theme::muted(&clipped),
    };
    pad_right(&styled, width)
}

/// A boxed notice for destinations that resolve but have no
/// implementation behind them.
#[must_use]
pub fn coming_soon(title: &str, width: u16) -> String {
    let label = format!("{title} — coming soon");
    let hint = "press any key to return to the menu";
    let inner = label.len().max(hint.len()) + 2;

    let top = format!("╭{}╮", "─".repeat(inner));
    let mid = format!("│ {} │", pad_right(&theme::header(&label), inner - 2));
    let sep = format!("│{}│", " ".repeat(inner));
    let low = format!("│ {} │", pad_right(&theme::muted(hint), inner - 2));
    let bottom = format!("╰{}╯", "─".repeat(inner));

    [top, mid, sep, low, bottom]
        .iter()
        .map(|line| center(line, width as usize))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fit view content into exactly `rows` lines (content views sit flush
/// above the status bar).
#[must_use]
pub fn stack(content: &str, rows: usize) -> String {
    let mut lines: Vec<&str> = content.lines().collect();
    lines.truncate(rows);
    let mut out: Vec<&str> = lines;
    while out.len() < rows {
        out.push("");
    }
    out.join("\n")
}

/// Center non-content views (chiefly the menu) in the rows above the
/// status bar.
#[must_use]
pub fn center_in(content: &str, rows: usize) -> String {
    center_vertical(content, rows)
}
