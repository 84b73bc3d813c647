#![forbid(unsafe_code)]

//! ANSI-aware text measurement and alignment helpers.
//!
//! Views render styled strings containing SGR escape sequences; layout math
//! (status-bar padding, menu centering, column widths) must measure the
//! *visible* width. These helpers skip over `ESC [ … m` sequences and use
//! `unicode-width` for everything else.

use unicode_width::UnicodeWidthChar;

/// Visible display width of a string, ignoring ANSI SGR sequences.
#[must_use]
pub fn display_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // CSI sequence: consume through the final byte (0x40-0x7e).
            if chars.peek() == Some(&'[') {
                chars.next();
                for t in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&t) {
                        break;
                    }
                }
            }
            continue;
        }
        width += c.width().unwrap_or(0);
    }
    width
}

/// Pad `s` with trailing spaces up to `width` visible columns.
///
/// Strings already at or beyond `width` are returned unchanged; this
/// never truncates (truncation would risk splitting an SGR sequence).
#[must_use]
pub fn pad_right(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current >= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + (width - current));
    out.push_str(s);
    for _ in current..width {
        out.push(' ');
    }
    out
}

/// Center `s` horizontally within `width` visible columns.
#[must_use]
pub fn center(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current >= width {
        return s.to_string();
    }
    let left = (width - current) / 2;
    let mut out = String::with_capacity(s.len() + left);
    for _ in 0..left {
        out.push(' ');
    }
    out.push_str(s);
    out
}

/// Center a multi-line block vertically within `height` rows.
///
/// Returns exactly `height` lines joined by `\n`. Blocks taller than
/// `height` are cut at the bottom.
#[must_use]
pub fn center_vertical(block: &str, height: usize) -> String {
    let lines: Vec<&str> = block.lines().collect();
    if lines.len() >= height {
        return lines[..height].join("\n");
    }
    let top = (height - lines.len()) / 2;
    let mut out: Vec<&str> = Vec::with_capacity(height);
    for _ in 0..top {
        out.push("");
    }
    out.extend(&lines);
    while out.len() < height {
        out.push("");
    }
    out.join("\n")
}

/// Truncate a plain (unstyled) string to at most `width` visible columns,
/// appending `…` when anything was cut.
#[must_use]
pub fn truncate_plain(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ignores_sgr_sequences() {
        let styled = "\u{1b}[1;32mBTC\u{1b}[0m";
        assert_eq!(display_width(styled), 3);
        assert_eq!(display_width("plain"), 5);
    }

    #[test]
    fn pad_right_fills_to_width() {
        assert_eq!(pad_right("ab", 5), "ab   ");
        assert_eq!(pad_right("abcdef", 3), "abcdef");
    }

    #[test]
    fn center_splits_slack() {
        assert_eq!(center("ab", 6), "  ab");
        let styled = "\u{1b}[1mab\u{1b}[0m";
        assert_eq!(center(styled, 6), format!("  {styled}"));
    }

    #[test]
    fn center_vertical_pads_both_sides() {
        let out = center_vertical("x", 3);
        assert_eq!(out, "\nx\n");
        assert_eq!(out.lines().count() + out.ends_with('\n') as usize, 3);
    }

    #[test]
    fn center_vertical_cuts_tall_blocks() {
        let out = center_vertical("a\nb\nc\nd", 2);
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_plain("bitcoin", 4), "bit…");
        assert_eq!(truncate_plain("btc", 4), "btc");
    }
}
