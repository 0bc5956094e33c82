//! Paint an inner reporter's output.

use super::{GREEN, RED, RESET, Stream};
use crate::error::SpecError;
use crate::observer::{AssertionInfo, ContextFailure, ContextInfo, Observer, SuiteInfo};

/// Wraps pass output in green and failure, error and unexpected-error output in red.
#[derive(Debug)]
pub struct Colored<O> {
    inner: O,
    stream: Stream,
}

impl<O: Observer> Colored<O> {
    pub fn new(inner: O, stream: Stream) -> Self {
        Self { inner, stream }
    }

    pub fn into_inner(self) -> O {
        self.inner
    }

    fn paint(&mut self, colour: &str, call: impl FnOnce(&mut O)) {
        self.stream.write_str(colour);
        call(&mut self.inner);
        self.stream.write_str(RESET);
    }
}

impl<O: Observer> Observer for Colored<O> {
    fn failed(&self) -> bool {
        self.inner.failed()
    }

    fn suite_started(&mut self, suite: &SuiteInfo) {
        self.inner.suite_started(suite);
    }

    fn suite_ended(&mut self, suite: &SuiteInfo) {
        self.inner.suite_ended(suite);
    }

    fn context_started(&mut self, context: &ContextInfo) {
        self.inner.context_started(context);
    }

    fn context_ended(&mut self, context: &ContextInfo) {
        self.inner.context_ended(context);
    }

    fn context_errored(&mut self, context: &ContextInfo, failure: &ContextFailure) {
        self.paint(RED, |inner| inner.context_errored(context, failure));
    }

    fn assertion_started(&mut self, assertion: &AssertionInfo) {
        self.inner.assertion_started(assertion);
    }

    fn assertion_passed(&mut self, assertion: &AssertionInfo) {
        self.paint(GREEN, |inner| inner.assertion_passed(assertion));
    }

    fn assertion_failed(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.paint(RED, |inner| inner.assertion_failed(assertion, error));
    }

    fn assertion_errored(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.paint(RED, |inner| inner.assertion_errored(assertion, error));
    }

    fn unexpected_error(&mut self, error: &SpecError) {
        self.paint(RED, |inner| inner.unexpected_error(error));
    }
}
