//! Hold back per-context text until the run is over.

use super::{Stream, rule};
use crate::error::SpecError;
use crate::observer::{AssertionInfo, ContextFailure, ContextInfo, Observer, SuiteInfo};

/// Buffers everything the inner reporter writes for a context. Passing contexts are dropped; failing ones are
/// written after the run, under a rule, followed by the inner reporter's summary. `PASS` lines are never kept.
///
/// Must wrap every other layer that writes per-context text to `stream`.
#[derive(Debug)]
pub struct Deferred<O> {
    inner: O,
    stream: Stream,
    held: String,
    context_failed: bool,
}

impl<O: Observer> Deferred<O> {
    pub fn new(inner: O, stream: Stream) -> Self {
        Self {
            inner,
            stream,
            held: String::new(),
            context_failed: false,
        }
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: Observer> Observer for Deferred<O> {
    fn failed(&self) -> bool {
        self.inner.failed()
    }

    fn suite_started(&mut self, suite: &SuiteInfo) {
        self.inner.suite_started(suite);
    }

    fn suite_ended(&mut self, suite: &SuiteInfo) {
        if !self.held.is_empty() {
            self.stream.write_str(&format!("\n{}\n{}", rule(), self.held.trim()));
            self.held.clear();
        }
        self.inner.suite_ended(suite);
    }

    fn context_started(&mut self, context: &ContextInfo) {
        self.context_failed = false;
        self.stream.push_layer();
        self.inner.context_started(context);
    }

    fn context_ended(&mut self, context: &ContextInfo) {
        self.inner.context_ended(context);
        let text = self.stream.pop_layer();
        if self.context_failed {
            self.held.push_str(&text);
        }
    }

    fn context_errored(&mut self, context: &ContextInfo, failure: &ContextFailure) {
        self.context_failed = true;
        self.inner.context_errored(context, failure);
    }

    fn assertion_started(&mut self, assertion: &AssertionInfo) {
        self.inner.assertion_started(assertion);
    }

    fn assertion_passed(&mut self, assertion: &AssertionInfo) {
        self.stream.push_layer();
        self.inner.assertion_passed(assertion);
        self.stream.pop_layer();
    }

    fn assertion_failed(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.context_failed = true;
        self.inner.assertion_failed(assertion, error);
    }

    fn assertion_errored(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.context_failed = true;
        self.inner.assertion_errored(assertion, error);
    }

    fn unexpected_error(&mut self, error: &SpecError) {
        self.stream.push_layer();
        self.inner.unexpected_error(error);
        let text = self.stream.pop_layer();
        self.held.push_str(&text);
    }
}
