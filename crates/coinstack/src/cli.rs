#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary
//! lean. Environment variables with the `COINSTACK_` prefix provide
//! defaults; explicit flags win over them.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
coinstack — full-screen terminal portfolio tracker

USAGE:
    coinstack [OPTIONS]

OPTIONS:
    --data-dir=PATH      Data directory (default: ~/.coinstack)
    --view=ACTION        Start on a view by its menu action (e.g. summary)
    --no-alt-screen      Render inline instead of the alternate screen
    --help, -h           Show this help message
    --version, -V        Show version

VIEWS:
    summary    Aggregated holdings and unrealized P/L
    buy        Buy-side trade ledger
    sell       Sell-side trade ledger
    stake      Staking positions
    loan       Outstanding loans
    snapshots  Point-in-time valuations
    settings   Currency and formatting
    ticker     Symbol search and price history

KEYBINDINGS:
    j/k, arrows     Move
    enter           Open / confirm
    esc             Back to menu
    q               Quit (menu only)
    ctrl+c          Quit from anywhere

ENVIRONMENT VARIABLES:
    COINSTACK_DATA_DIR   Override --data-dir
    COINSTACK_VIEW       Override --view
    COINSTACK_LOG        Write a tracing log to this file";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Data directory for the portfolio, settings, and price files.
    pub data_dir: PathBuf,
    /// Menu action to activate on startup, if any.
    pub start_view: Option<String>,
    /// Whether to use the alternate screen.
    pub alt_screen: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            start_view: None,
            alt_screen: true,
        }
    }
}

fn default_data_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".coinstack")
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Prints help/version and exits for `--help`/`--version`; exits
    /// with an error message for unknown flags.
    #[must_use]
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1)) {
            Ok(ParseOutcome::Run(opts)) => opts,
            Ok(ParseOutcome::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(ParseOutcome::Version) => {
                println!("coinstack {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("try --help for usage");
                process::exit(2);
            }
        }
    }

    fn parse_from(args: impl IntoIterator<Item = String>) -> Result<ParseOutcome, String> {
        let mut opts = Self::default();

        if let Ok(dir) = env::var("COINSTACK_DATA_DIR") {
            if !dir.is_empty() {
                opts.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(view) = env::var("COINSTACK_VIEW") {
            if !view.is_empty() {
                opts.start_view = Some(view);
            }
        }

        for arg in args {
            if let Some(value) = arg.strip_prefix("--data-dir=") {
                opts.data_dir = PathBuf::from(value);
            } else if let Some(value) = arg.strip_prefix("--view=") {
                opts.start_view = Some(value.to_string());
            } else if arg == "--no-alt-screen" {
                opts.alt_screen = false;
            } else if arg == "--help" || arg == "-h" {
                return Ok(ParseOutcome::Help);
            } else if arg == "--version" || arg == "-V" {
                return Ok(ParseOutcome::Version);
            } else {
                return Err(format!("unknown argument: {arg}"));
            }
        }

        Ok(ParseOutcome::Run(opts))
    }
}

enum ParseOutcome {
    Run(Opts),
    Help,
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Opts, String> {
        match Opts::parse_from(args.iter().map(|s| (*s).to_string())) {
            Ok(ParseOutcome::Run(opts)) => Ok(opts),
            Ok(_) => Err("help/version".to_string()),
            Err(e) => Err(e),
        }
    }

    #[test]
    fn defaults_without_args() {
        let opts = parse(&[]).unwrap();
        assert!(opts.alt_screen);
        assert_eq!(opts.start_view, None);
    }

    #[test]
    fn flags_override_defaults() {
        let opts = parse(&["--data-dir=/tmp/cs", "--view=summary", "--no-alt-screen"]).unwrap();
        assert_eq!(opts.data_dir, PathBuf::from("/tmp/cs"));
        assert_eq!(opts.start_view.as_deref(), Some("summary"));
        assert!(!opts.alt_screen);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = parse(&["--frobnicate"]).unwrap_err();
        assert!(err.contains("--frobnicate"));
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert!(matches!(
            Opts::parse_from(["--help".to_string()]),
            Ok(ParseOutcome::Help)
        ));
        assert!(matches!(
            Opts::parse_from(["-V".to_string()]),
            Ok(ParseOutcome::Version)
        ));
    }
}
