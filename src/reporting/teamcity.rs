//! TeamCity service messages for CI integration.
//!
//! Every assertion becomes a TeamCity test named `Context -> assertion label`. A context error becomes a test
//! named after the context; when a later step of the same context also raises (a teardown after a failed setup),
//! that error is a separate test named `Context (role)`. An unexpected error is a test named `Test error`. Spec stdout and stderr are captured
//! per context and attached to the test that was running when the text was written.

use std::fmt;

use super::Stream;
use crate::error::SpecError;
use crate::observer::{AssertionInfo, ContextFailure, ContextInfo, Observer, SuiteInfo};
use crate::output::{Channel, OutputCapture};

/// Escape a value for a service message attribute.
///
/// ```rust
/// use specrun::reporting::escape;
///
/// assert_eq!(escape("it's [ok]"), "it|'s |[ok|]");
/// assert_eq!(escape("a\nb"), "a|nb");
/// assert_eq!(escape("é"), "|0x00e9");
/// ```
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("|n"),
            '\r' => out.push_str("|r"),
            '\'' | '[' | ']' | '|' => {
                out.push('|');
                out.push(ch);
            }
            ch if u32::from(ch) >= 128 => out.push_str(&format!("|0x{:04x}", u32::from(ch))),
            ch => out.push(ch),
        }
    }
    out
}

/// `##teamcity[tag key='value' ...]`, with the tag and every value escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMessage {
    tag: String,
    attributes: Vec<(&'static str, String)>,
}

impl ServiceMessage {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }
}

impl fmt::Display for ServiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "##teamcity[{}", escape(&self.tag))?;
        for (key, value) in &self.attributes {
            write!(f, " {}='{}'", key, escape(value))?;
        }
        f.write_str("]")
    }
}

const UNEXPECTED_ERROR_TEST: &str = "Test error";

#[derive(Debug)]
pub struct TeamCityReporter {
    stream: Stream,
    prefix: String,
    stdout: Option<OutputCapture>,
    stderr: Option<OutputCapture>,
    failed: bool,
    context_errored: bool,
}

impl TeamCityReporter {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            prefix: String::new(),
            stdout: None,
            stderr: None,
            failed: false,
            context_errored: false,
        }
    }

    fn emit(&self, message: ServiceMessage) {
        self.stream.line(&message.to_string());
    }

    fn output_buffers(&self, name: &str) {
        for (capture, tag) in [(&self.stdout, "testStdOut"), (&self.stderr, "testStdErr")] {
            let Some(capture) = capture else {
                continue;
            };
            let text = capture.take();
            if !text.is_empty() {
                self.emit(ServiceMessage::new(tag).attr("name", name).attr("out", text));
            }
        }
    }

    fn failed_test(&mut self, name: &str, error: &SpecError) {
        self.failed = true;
        self.emit(
            ServiceMessage::new("testFailed")
                .attr("name", name)
                .attr("message", error.message())
                .attr("details", error.render_lines().join("\n")),
        );
    }

    fn release_captures(&mut self) {
        self.stdout = None;
        self.stderr = None;
    }

    fn assertion_name(&self, assertion: &AssertionInfo) -> String {
        format!("{}{}", self.prefix, assertion.label)
    }
}

fn acquire(channel: Channel, context: &ContextInfo) -> Option<OutputCapture> {
    match OutputCapture::acquire(channel) {
        Ok(capture) => Some(capture),
        Err(err) => {
            tracing::warn!(%err, context = %context.display_name(), "not capturing output");
            None
        }
    }
}

impl Observer for TeamCityReporter {
    fn failed(&self) -> bool {
        self.failed
    }

    fn suite_started(&mut self, suite: &SuiteInfo) {
        self.emit(ServiceMessage::new("testSuiteStarted").attr("name", suite.name.as_str()));
    }

    fn suite_ended(&mut self, suite: &SuiteInfo) {
        self.emit(ServiceMessage::new("testSuiteFinished").attr("name", suite.name.as_str()));
    }

    fn context_started(&mut self, context: &ContextInfo) {
        self.stdout = acquire(Channel::Stdout, context);
        self.stderr = acquire(Channel::Stderr, context);
        self.prefix = format!("{} -> ", context.display_name());
        self.context_errored = false;
    }

    fn context_ended(&mut self, _context: &ContextInfo) {
        self.release_captures();
        self.prefix.clear();
    }

    fn context_errored(&mut self, context: &ContextInfo, failure: &ContextFailure) {
        self.prefix.clear();
        let name = if self.context_errored {
            format!("{} ({})", context.display_name(), failure.role)
        } else {
            context.display_name()
        };
        self.context_errored = true;
        self.emit(ServiceMessage::new("testStarted").attr("name", name.as_str()));
        self.output_buffers(&name);
        self.failed_test(&name, &failure.error);
        self.emit(ServiceMessage::new("testFinished").attr("name", name.as_str()));
        self.release_captures();
    }

    fn assertion_started(&mut self, assertion: &AssertionInfo) {
        self.emit(ServiceMessage::new("testStarted").attr("name", self.assertion_name(assertion)));
    }

    fn assertion_passed(&mut self, assertion: &AssertionInfo) {
        let name = self.assertion_name(assertion);
        self.output_buffers(&name);
        self.emit(ServiceMessage::new("testFinished").attr("name", name));
    }

    fn assertion_failed(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        let name = self.assertion_name(assertion);
        self.output_buffers(&name);
        self.failed_test(&name, error);
        self.emit(ServiceMessage::new("testFinished").attr("name", name));
    }

    fn assertion_errored(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.assertion_failed(assertion, error);
    }

    fn unexpected_error(&mut self, error: &SpecError) {
        self.prefix.clear();
        self.emit(ServiceMessage::new("testStarted").attr("name", UNEXPECTED_ERROR_TEST));
        self.failed_test(UNEXPECTED_ERROR_TEST, error);
        self.emit(ServiceMessage::new("testFinished").attr("name", UNEXPECTED_ERROR_TEST));
    }
}
