#![forbid(unsafe_code)]

//! Terminal lifecycle and frame presentation.
//!
//! The writer owns the terminal: it enters raw mode and the alternate
//! screen, presents full-frame strings with per-line diffing against the
//! previous frame, and restores the terminal on exit. Restore also runs
//! from `Drop` and from the installable panic hook, so a crashed program
//! never strands the user in raw mode.

use std::io::{self, Stdout, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::style::Print;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use tracing::warn;

/// Set once a writer has entered the terminal; the panic hook only
/// restores when this is still set.
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Owns terminal setup, presentation, and teardown.
pub struct TerminalWriter {
    out: Stdout,
    alt_screen: bool,
    entered: bool,
    last_lines: Vec<String>,
}

impl TerminalWriter {
    /// Create a writer. Nothing touches the terminal until [`enter`].
    ///
    /// [`enter`]: TerminalWriter::enter
    #[must_use]
    pub fn new(alt_screen: bool) -> Self {
        Self {
            out: io::stdout(),
            alt_screen,
            entered: false,
            last_lines: Vec::new(),
        }
    }

    /// Enter raw mode (and the alternate screen when configured), hide the
    /// cursor, and clear.
    pub fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        if self.alt_screen {
            queue!(self.out, EnterAlternateScreen)?;
        }
        queue!(
            self.out,
            EnableBracketedPaste,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        self.out.flush()?;
        self.entered = true;
        TERMINAL_ACTIVE.store(true, Ordering::Release);
        Ok(())
    }

    /// Present a full frame, rewriting only the lines that changed since
    /// the previous frame.
    pub fn present(&mut self, frame: &str) -> io::Result<()> {
        let lines: Vec<String> = frame.split('\n').map(str::to_string).collect();

        for (row, line) in lines.iter().enumerate() {
            if self.last_lines.get(row) == Some(line) {
                continue;
            }
            queue!(
                self.out,
                MoveTo(0, row as u16),
                Clear(ClearType::UntilNewLine),
                Print(line)
            )?;
        }
        // Rows the previous frame used beyond the new frame's height.
        for row in lines.len()..self.last_lines.len() {
            queue!(
                self.out,
                MoveTo(0, row as u16),
                Clear(ClearType::UntilNewLine)
            )?;
        }

        self.out.flush()?;
        self.last_lines = lines;
        Ok(())
    }

    /// Restore the terminal: show the cursor, leave the alternate screen,
    /// disable raw mode.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        TERMINAL_ACTIVE.store(false, Ordering::Release);
        queue!(self.out, DisableBracketedPaste, Show)?;
        if self.alt_screen {
            queue!(self.out, LeaveAlternateScreen)?;
        }
        self.out.flush()?;
        disable_raw_mode()
    }
}

impl Drop for TerminalWriter {
    fn drop(&mut self) {
        if self.entered {
            if let Err(e) = self.leave() {
                warn!("terminal restore on drop failed: {e}");
            }
        }
    }
}

/// Install a panic hook that restores the terminal before the default
/// hook prints the panic message. Without this, a panic in raw mode
/// leaves the message garbled and the shell unusable.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if TERMINAL_ACTIVE.swap(false, Ordering::AcqRel) {
            let mut out = io::stdout();
            let _ = execute!(out, DisableBracketedPaste, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_writer_has_not_entered() {
        let writer = TerminalWriter::new(true);
        assert!(!writer.entered);
        assert!(writer.last_lines.is_empty());
    }

    #[test]
    fn leave_before_enter_is_a_noop() {
        let mut writer = TerminalWriter::new(false);
        assert!(writer.leave().is_ok());
    }
}
