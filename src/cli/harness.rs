//! Entry point for test targets that run a suite of specs.
//!
//! ```toml
//! [[test]]
//! name = "specs"
//! harness = false
//! ```
//!
//! ```rust,no_run
//! fn main() -> std::process::ExitCode {
//!     let suite = specrun::Suite::new("specs");
//!     specrun::cli::harness::run_main(&suite)
//! }
//! ```

use clap::Parser;

use super::{ExitCode, init_tracing};
use crate::engine::{Suite, run_suite};
use crate::observer::Observer;
use crate::reporting::{ReporterConfig, Stream};

/// Options accepted by a spec test target.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(about = "Run specs", long_about = None)]
pub struct RunnerArgs {
    /// Print every context and assertion as it runs
    #[arg(short, long)]
    pub verbose: bool,
    /// Let spec output through instead of capturing it
    #[arg(short = 's', long = "no-capture")]
    pub no_capture: bool,
    /// Emit TeamCity service messages
    #[arg(long)]
    pub teamcity: bool,
    /// Disable coloured output
    #[arg(long = "no-colour", alias = "no-color")]
    pub no_colour: bool,
    /// Do not print the run's duration
    #[arg(long = "no-timing")]
    pub no_timing: bool,
}

impl RunnerArgs {
    pub fn config(&self) -> ReporterConfig {
        ReporterConfig::new()
            .with_verbose(self.verbose)
            .with_capture(!self.no_capture)
            .with_colour(!self.no_colour)
            .with_timing(!self.no_timing)
            .with_teamcity(self.teamcity)
    }
}

/// Parse the process arguments, run `suite`, and return the exit status.
///
/// Exit codes: 0 when everything passed, 1 when anything failed, 2 when a spec could not be classified.
pub fn run_main(suite: &Suite) -> std::process::ExitCode {
    init_tracing("warn");
    let args = match RunnerArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::Classification.into()
            } else {
                ExitCode::Success.into()
            };
        }
    };
    run_with(suite, &args, Stream::stderr()).into()
}

/// Run `suite` with explicit options, reporting to `stream`.
pub fn run_with(suite: &Suite, args: &RunnerArgs, stream: Stream) -> ExitCode {
    let mut reporters = args.config().build(stream.clone());
    match run_suite(suite, &mut reporters) {
        Err(err) => {
            stream.line(&format!("{:?}", miette::Report::new(err)));
            ExitCode::Classification
        }
        Ok(()) if reporters.failed() => ExitCode::Failure,
        Ok(()) => ExitCode::Success,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = RunnerArgs::try_parse_from(["specs", "-v", "-s", "--no-color"]).unwrap();
        assert!(args.verbose);
        assert!(args.no_capture);
        assert!(args.no_colour);
        let config = args.config();
        assert!(!config.capture);
        assert!(!config.colour);
        assert!(config.timing);
    }

    #[test]
    fn test_empty_suite_passes() {
        let (stream, buffer) = Stream::memory();
        let args = RunnerArgs {
            verbose: true,
            no_colour: true,
            no_timing: true,
            ..RunnerArgs::default()
        };
        let code = run_with(&Suite::new("empty"), &args, stream);
        assert_eq!(code, ExitCode::Success);
        assert!(buffer.contents().contains("PASSED!\n0 contexts, 0 assertions\n"));
    }
}
