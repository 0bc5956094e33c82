//! The plain-text reporter every text stack is built around.

use super::{Stream, pluralise, rule, write_indented};
use crate::error::SpecError;
use crate::observer::{AssertionInfo, ContextFailure, ContextInfo, Observer, SuiteInfo};

/// Writes every context and assertion as it happens, then a summary.
///
/// ```text
/// Adding -> (1, 2)
///   PASS: the sum is three
///   FAIL: the sum is odd
///     at tests/adding.rs:14:9
///     AssertionFailure: expected an odd number
///
/// ----------------------------------------------------------------------
/// FAILED!
/// 1 context, 2 assertions: 1 failed, 0 errors
/// ```
#[derive(Debug)]
pub struct VerboseReporter {
    stream: Stream,
    contexts: usize,
    assertions: usize,
    failures: usize,
    errors: usize,
    // A context counts as one error however many of its steps raise.
    context_errored: bool,
}

impl VerboseReporter {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            contexts: 0,
            assertions: 0,
            failures: 0,
            errors: 0,
            context_errored: false,
        }
    }

    fn counts(&self) -> String {
        let mut counts = format!(
            "{}, {}",
            pluralise("context", self.contexts),
            pluralise("assertion", self.assertions)
        );
        if self.failed() {
            counts.push_str(&format!(": {} failed, {}", self.failures, pluralise("error", self.errors)));
        }
        counts
    }
}

impl Observer for VerboseReporter {
    fn failed(&self) -> bool {
        self.failures > 0 || self.errors > 0
    }

    fn suite_ended(&mut self, _suite: &SuiteInfo) {
        self.stream.line("");
        self.stream.line(&rule());
        self.stream.line(if self.failed() { "FAILED!" } else { "PASSED!" });
        self.stream.line(&self.counts());
    }

    fn context_started(&mut self, context: &ContextInfo) {
        self.contexts += 1;
        self.context_errored = false;
        self.stream.line(&context.display_name());
    }

    fn context_errored(&mut self, _context: &ContextInfo, failure: &ContextFailure) {
        if !self.context_errored {
            self.context_errored = true;
            self.errors += 1;
        }
        write_indented(&self.stream, &failure.error.render_lines(), 2);
    }

    fn assertion_started(&mut self, _assertion: &AssertionInfo) {
        self.assertions += 1;
    }

    fn assertion_passed(&mut self, assertion: &AssertionInfo) {
        self.stream.line(&format!("  PASS: {}", assertion.label));
    }

    fn assertion_failed(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.failures += 1;
        self.stream.line(&format!("  FAIL: {}", assertion.label));
        write_indented(&self.stream, &error.render_lines(), 4);
    }

    fn assertion_errored(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.errors += 1;
        self.stream.line(&format!("  ERROR: {}", assertion.label));
        write_indented(&self.stream, &error.render_lines(), 4);
    }

    fn unexpected_error(&mut self, error: &SpecError) {
        self.errors += 1;
        write_indented(&self.stream, &error.render_lines(), 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_wording() {
        let (stream, _) = Stream::memory();
        let mut reporter = VerboseReporter::new(stream);
        reporter.contexts = 1;
        reporter.assertions = 1;
        assert_eq!(reporter.counts(), "1 context, 1 assertion");
        reporter.assertions = 3;
        reporter.failures = 2;
        reporter.errors = 1;
        assert_eq!(reporter.counts(), "1 context, 3 assertions: 2 failed, 1 error");
    }

    #[test]
    fn test_context_error_counts_once_per_context() {
        use specrun_core::RoleId;

        let (stream, buffer) = Stream::memory();
        let mut reporter = VerboseReporter::new(stream);
        let failure = |role, message| ContextFailure {
            role,
            error: SpecError::error(message),
        };

        let twice = ContextInfo::new("BrokenTwice", None);
        reporter.context_started(&twice);
        reporter.context_errored(&twice, &failure(RoleId::Setup, "first"));
        reporter.context_errored(&twice, &failure(RoleId::Teardown, "second"));
        let once = ContextInfo::new("BrokenOnce", None);
        reporter.context_started(&once);
        reporter.context_errored(&once, &failure(RoleId::Action, "third"));

        assert_eq!(reporter.errors, 2);
        let output = buffer.contents();
        assert!(output.contains("Error: second"), "{output}");
    }
}
