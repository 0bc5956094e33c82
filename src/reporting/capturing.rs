//! Attach a context's captured stdout to its failures.

use super::{Stream, centred_in_dashes, write_indented};
use crate::error::SpecError;
use crate::observer::{AssertionInfo, ContextFailure, ContextInfo, Observer, SuiteInfo};
use crate::output::{Channel, OutputCapture};

/// Captures spec stdout for the duration of each context. After the inner reporter has written a failure or an
/// error, the text captured so far is written under it between banners. A context error ends the capture.
#[derive(Debug)]
pub struct Capturing<O> {
    inner: O,
    stream: Stream,
    capture: Option<OutputCapture>,
}

impl<O: Observer> Capturing<O> {
    pub fn new(inner: O, stream: Stream) -> Self {
        Self {
            inner,
            stream,
            capture: None,
        }
    }

    pub fn into_inner(self) -> O {
        self.inner
    }

    fn write_captured(&self, indent: usize) {
        let Some(capture) = &self.capture else {
            return;
        };
        let text = capture.contents();
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let pad = " ".repeat(indent);
        self.stream
            .line(&format!("{pad}{}", centred_in_dashes(" >> begin captured stdout << ", indent)));
        write_indented(&self.stream, &text.lines().collect::<Vec<_>>(), indent);
        self.stream
            .line(&format!("{pad}{}", centred_in_dashes(" >> end captured stdout << ", indent)));
    }
}

impl<O: Observer> Observer for Capturing<O> {
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
        self.capture = match OutputCapture::acquire(Channel::Stdout) {
            Ok(capture) => Some(capture),
            Err(err) => {
                tracing::warn!(%err, context = %context.display_name(), "not capturing output");
                None
            }
        };
        self.inner.context_started(context);
    }

    fn context_ended(&mut self, context: &ContextInfo) {
        self.capture = None;
        self.inner.context_ended(context);
    }

    fn context_errored(&mut self, context: &ContextInfo, failure: &ContextFailure) {
        self.inner.context_errored(context, failure);
        self.write_captured(2);
        self.capture = None;
    }

    fn assertion_started(&mut self, assertion: &AssertionInfo) {
        self.inner.assertion_started(assertion);
    }

    fn assertion_passed(&mut self, assertion: &AssertionInfo) {
        self.inner.assertion_passed(assertion);
    }

    fn assertion_failed(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.inner.assertion_failed(assertion, error);
        self.write_captured(4);
    }

    fn assertion_errored(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.inner.assertion_errored(assertion, error);
        self.write_captured(4);
    }

    fn unexpected_error(&mut self, error: &SpecError) {
        self.inner.unexpected_error(error);
    }
}
