#![forbid(unsafe_code)]

//! coinstack binary entry point.

use std::env;
use std::fs;

use coinstack_runtime::{Model, Program, ProgramConfig, run_commands, terminal_writer};
use tracing::info;

use coinstack::app::{AppModel, AppMsg};
use coinstack::cli;

fn main() {
    let opts = cli::Opts::parse();
    init_logging();

    let mut model = match AppModel::open(&opts.data_dir) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("failed to open data directory: {e}");
            std::process::exit(1);
        }
    };

    // Jump straight to the requested view before the loop starts.
    if let Some(action) = opts.start_view.as_deref() {
        let cmd = model.update(AppMsg::MenuSelect(action.to_string()));
        run_commands(&mut model, cmd);
    }

    terminal_writer::install_panic_hook();

    let config = ProgramConfig {
        alt_screen: opts.alt_screen,
        ..ProgramConfig::default()
    };
    match Program::with_config(model, config) {
        Ok(mut program) => {
            if let Err(e) = program.run() {
                eprintln!("runtime error: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("failed to initialize: {e}");
            std::process::exit(1);
        }
    }
}

/// Route tracing output to a file when `COINSTACK_LOG` is set; stdout
/// belongs to the TUI.
fn init_logging() {
    let Some(path) = env::var_os("COINSTACK_LOG") else {
        return;
    };
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        eprintln!("could not open log file {}", path.to_string_lossy());
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    info!("logging initialized");
}
