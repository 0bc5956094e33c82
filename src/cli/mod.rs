//! CLI module for specrun
//!
//! Two entry points live here:
//!
//! - [`run`]: the `specrun` binary, which exposes the naming vocabulary (`roles`, `classify`, `escape`).
//! - [`harness::run_main`]: the entry point of a `harness = false` test target that runs a [`Suite`](crate::Suite).
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod harness;

use std::process;

use clap::{Parser, Subcommand};
use thiserror::Error;

/// Process exit status of a command or a spec run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    /// A spec failed, or a command found a problem to report.
    Failure = 1,
    /// A spec's method names could not be classified; nothing ran.
    Classification = 2,
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("error writing output: {0}")]
    Output(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Inspect the specrun naming convention
#[derive(Parser, Debug)]
#[command(name = "specrun")]
#[command(version = VERSION)]
#[command(about = "Inspect the specrun method-naming convention", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the role pattern table
    Roles,

    /// Report the role and readable label of method names
    Classify {
        /// Method names to classify
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,
    },

    /// Print text escaped for a TeamCity service message
    Escape {
        #[arg(value_name = "TEXT")]
        text: String,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Initialize structured logging with an env-based filter.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .try_init();
}

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(ExitCode::Success) => {}
        Ok(code) => process::exit(code as i32),
        Err(err) => {
            eprintln!("{err}");
            process::exit(ExitCode::Failure as i32);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::Roles => commands::print_roles(&mut out),
        Command::Classify { names } => commands::classify_names(&mut out, &names),
        Command::Escape { text } => commands::print_escaped(&mut out, &text),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_roles() {
        let cli = Cli::try_parse_from(["specrun", "roles"]).unwrap();
        assert!(matches!(cli.command, Command::Roles));
    }

    #[test]
    fn test_cli_parse_classify() {
        let cli = Cli::try_parse_from(["specrun", "classify", "because", "it_works"]).unwrap();
        if let Command::Classify { names } = cli.command {
            assert_eq!(names, vec!["because", "it_works"]);
        } else {
            panic!("Expected Classify command");
        }
    }

    #[test]
    fn test_cli_classify_requires_a_name() {
        assert!(Cli::try_parse_from(["specrun", "classify"]).is_err());
    }
}
