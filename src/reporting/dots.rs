//! One character of progress per outcome.

use super::Stream;
use crate::error::SpecError;
use crate::observer::{AssertionInfo, ContextFailure, ContextInfo, Observer};

/// Writes `.` per passing assertion, `F` per failure and `E` per error (assertion, context or unexpected).
#[derive(Debug)]
pub struct DotsReporter {
    stream: Stream,
}

impl DotsReporter {
    pub fn new(stream: Stream) -> Self {
        Self { stream }
    }
}

impl Observer for DotsReporter {
    fn assertion_passed(&mut self, _assertion: &AssertionInfo) {
        self.stream.write_str(".");
    }

    fn assertion_failed(&mut self, _assertion: &AssertionInfo, _error: &SpecError) {
        self.stream.write_str("F");
    }

    fn assertion_errored(&mut self, _assertion: &AssertionInfo, _error: &SpecError) {
        self.stream.write_str("E");
    }

    fn context_errored(&mut self, _context: &ContextInfo, _failure: &ContextFailure) {
        self.stream.write_str("E");
    }

    fn unexpected_error(&mut self, _error: &SpecError) {
        self.stream.write_str("E");
    }
}
