//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for sumo-export using clap.
//! Without a subcommand the tool exports; `configure` stores credentials.

pub mod commands;

use clap::{ArgAction, Parser, Subcommand};

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "sumo-export.toml";

/// sumo-export - Sumo Logic search job exporter
#[derive(Parser, Debug)]
#[command(name = "sumo-export")]
#[command(version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Path to configuration file [default: sumo-export.toml]
    #[arg(short, long, global = true, env = "SUMO_EXPORT_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "SUMO_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    #[command(flatten)]
    pub export: commands::export::ExportArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Configuration file to load
    pub fn config_path(&self) -> &str {
        self.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store Sumo Logic credentials for later runs
    Configure(commands::configure::ConfigureArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["sumo-export"]);
        assert!(cli.config.is_none());
        assert_eq!(cli.config_path(), DEFAULT_CONFIG_FILE);
        assert!(cli.command.is_none());
        assert_eq!(cli.export.start(), None);
        assert_eq!(cli.export.stop(), None);
    }

    #[test]
    fn test_cli_parse_positional_dates() {
        let cli = Cli::parse_from(["sumo-export", "2024-01-01", "2024-01-08"]);
        assert_eq!(cli.export.start(), Some("2024-01-01"));
        assert_eq!(cli.export.stop(), Some("2024-01-08"));
    }

    #[test]
    fn test_cli_parse_flag_dates() {
        let cli = Cli::parse_from(["sumo-export", "-s", "2024-01-01", "--stop", "2024-01-08"]);
        assert_eq!(cli.export.start(), Some("2024-01-01"));
        assert_eq!(cli.export.stop(), Some("2024-01-08"));
    }

    #[test]
    fn test_cli_rejects_start_twice() {
        let result = Cli::try_parse_from(["sumo-export", "2024-01-01", "-s", "2024-01-02"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_configure() {
        let cli = Cli::parse_from(["sumo-export", "configure"]);
        assert!(matches!(cli.command, Some(Commands::Configure(_))));
    }

    #[test]
    fn test_cli_parse_with_config_and_log_level() {
        let cli = Cli::parse_from([
            "sumo-export",
            "--config",
            "custom.toml",
            "-l",
            "debug",
            "2024-01-01",
        ]);
        assert_eq!(cli.config_path(), "custom.toml");
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_short_version_flag() {
        let err = Cli::try_parse_from(["sumo-export", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
