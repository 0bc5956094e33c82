//! Reporters: observers that present a run.
//!
//! The text reporter is built by stacking decorators around [`VerboseReporter`], each adding one presentation
//! concern:
//!
//! - [`Colored`] paints pass lines green and failure lines red;
//! - [`Capturing`] captures spec stdout per context and prints it under failures;
//! - [`Deferred`] holds back per-context text and prints only failing contexts, after the run.
//!
//! [`DotsReporter`], [`TimedReporter`] and [`TeamCityReporter`] stand alone. [`ReporterConfig`] assembles the
//! usual combinations.

mod capturing;
mod colored;
mod config;
mod deferred;
mod dots;
mod stream;
mod teamcity;
mod timed;
mod verbose;

pub use capturing::Capturing;
pub use colored::Colored;
pub use config::ReporterConfig;
pub use deferred::Deferred;
pub use dots::DotsReporter;
pub use stream::{SharedBuffer, Stream};
pub use teamcity::{ServiceMessage, TeamCityReporter, escape};
pub use timed::{TimedReporter, format_elapsed};
pub use verbose::VerboseReporter;

/// Width of the summary rule.
pub const RULE_WIDTH: usize = 70;

pub(crate) const GREEN: &str = "\x1b[32m";
pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const RESET: &str = "\x1b[0m";

pub(crate) fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// `1 context`, `2 contexts`.
pub fn pluralise(noun: &str, count: usize) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Centre `text` in dashes so the line is `RULE_WIDTH - indent` wide.
pub(crate) fn centred_in_dashes(text: &str, indent: usize) -> String {
    let width = RULE_WIDTH.saturating_sub(indent);
    format!("{text:-^width$}")
}

/// Write each line of `lines` prefixed with `indent` spaces.
pub(crate) fn write_indented<S: AsRef<str>>(stream: &Stream, lines: &[S], indent: usize) {
    let pad = " ".repeat(indent);
    for line in lines {
        stream.line(&format!("{pad}{}", line.as_ref()));
    }
}
