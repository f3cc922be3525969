//! Rill CLI - the interactive interpreter and script runner.
//!
//! With no arguments this starts a REPL against a persistent scope. Given a
//! path, it runs that script once against a fresh scope and exits.

mod config;
mod diagnostics;
mod error;
mod repl;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use error::{Result, RillError};

/// Rill - a small dynamically-typed scripting language.
#[derive(Parser, Debug)]
#[command(name = "rill")]
#[command(author = "Rill Project Developers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "The Rill interactive interpreter and script runner", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true, env = "RILL_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RILL_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "RILL_NO_COLOR")]
    no_color: bool,

    /// Script to run. If omitted, starts an interactive REPL.
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.no_color) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let config = match load_config(cli.config.as_deref(), cli.verbose, cli.no_color) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.script {
        Some(path) => match runner::run_file(&path, config.no_color) {
            Ok(()) => ExitCode::SUCCESS,
            Err(RillError::Script(rendered)) => {
                eprintln!("{rendered}");
                ExitCode::FAILURE
            }
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
        None => match repl::run(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
    }
}

/// Initializes the `tracing` subscriber. Interpreter crates themselves stay
/// silent; only the CLI host logs - one `debug!` span per script
/// run, one `trace!` per REPL line.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| RillError::Config(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}

fn load_config(config_path: Option<&std::path::Path>, verbose: bool, no_color: bool) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    config.verbose = config.verbose || verbose;
    config.no_color = config.no_color || no_color;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_no_script() {
        let cli = Cli::parse_from(["rill"]);
        assert!(cli.script.is_none());
        assert!(!cli.verbose);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_cli_accepts_script_path() {
        let cli = Cli::parse_from(["rill", "program.rill"]);
        assert_eq!(cli.script, Some(PathBuf::from("program.rill")));
    }

    #[test]
    fn test_cli_verbose_and_no_color_flags() {
        let cli = Cli::parse_from(["rill", "--verbose", "--no-color", "program.rill"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
    }

    #[test]
    fn test_cli_config_flag() {
        let cli = Cli::parse_from(["rill", "--config", "custom.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}
