//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Console phonebook over a delimited text file.
#[derive(Debug, Parser)]
#[command(name = "phonebook", version)]
pub struct Cli {
    /// TOML config file; built-in defaults are used when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Phonebook file name; skips the startup file prompt.
    #[arg(long, value_name = "NAME")]
    pub file: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::parse_from([
            "phonebook",
            "--file",
            "work",
            "--log-level",
            "warn",
            "--log-dir",
            "/tmp/phonebook-logs",
        ]);
        assert_eq!(cli.file.as_deref(), Some("work"));
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
        assert!(cli.config.is_none());
    }
}
