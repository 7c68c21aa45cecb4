//! Console phonebook entry point.
//!
//! # Responsibility
//! - Resolve config, logging and the phonebook file, then hand stdin/stdout
//!   to the command loop.
//! - Turn fatal startup errors into a non-zero exit code.

mod app;
mod cli;
mod console;

use crate::app::{choose_file_name, App};
use crate::cli::Cli;
use crate::console::Console;
use clap::Parser;
use log::{error, info};
use phonebook_core::{init_logging, load_config, normalize_file_name, Store};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={}", err);
            eprintln!("phonebook: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    let log_dir = cli
        .log_dir
        .or_else(|| config.log_dir.clone())
        .unwrap_or_else(default_log_dir);
    if let Err(err) = init_logging(&config.log_level, &log_dir) {
        // Logging is best-effort; the phonebook stays usable without it.
        eprintln!("phonebook: logging disabled: {err}");
    }

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    let file_name = match cli.file {
        Some(raw) => normalize_file_name(&raw, &config.file_name),
        None => choose_file_name(&mut console, &config)?,
    };

    let store = Store::open(config.repository(&file_name))?;
    info!(
        "event=session_start module=cli status=ok entries={}",
        store.len()
    );

    App::new(store, &config, console).run()?;
    info!("event=app_exit module=cli status=ok");
    Ok(())
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("phonebook").join("logs")
}
