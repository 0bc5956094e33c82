//! Shared helpers for the integration tests.

#![allow(dead_code)]

use specrun::{AssertionInfo, ContextFailure, ContextInfo, Observer, SpecError, SuiteInfo};

/// Records every call as one line of text.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<String>,
}

impl Recorder {
    pub fn count(&self, prefix: &str) -> usize {
        self.events.iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl Observer for Recorder {
    fn suite_started(&mut self, suite: &SuiteInfo) {
        self.events.push(format!("suite_started {}", suite.name));
    }
    fn suite_ended(&mut self, suite: &SuiteInfo) {
        self.events.push(format!("suite_ended {}", suite.name));
    }
    fn context_started(&mut self, context: &ContextInfo) {
        self.events.push(format!("context_started {}", context.display_name()));
    }
    fn context_ended(&mut self, context: &ContextInfo) {
        self.events.push(format!("context_ended {}", context.display_name()));
    }
    fn context_errored(&mut self, context: &ContextInfo, failure: &ContextFailure) {
        self.events.push(format!(
            "context_errored {} {}: {}",
            context.display_name(),
            failure.role,
            failure.error.message()
        ));
    }
    fn assertion_started(&mut self, assertion: &AssertionInfo) {
        self.events.push(format!("assertion_started {}", assertion.method));
    }
    fn assertion_passed(&mut self, assertion: &AssertionInfo) {
        self.events.push(format!("assertion_passed {}", assertion.method));
    }
    fn assertion_failed(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.events.push(format!("assertion_failed {}: {}", assertion.method, error.message()));
    }
    fn assertion_errored(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.events.push(format!("assertion_errored {}: {}", assertion.method, error.message()));
    }
    fn unexpected_error(&mut self, error: &SpecError) {
        self.events.push(format!("unexpected_error {}", error.message()));
    }
}

/// Replace every `path.rs:line:col` location with `<frame>`; locations move whenever a test file is edited.
pub fn scrub_frames(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find(".rs:") {
        let after = &rest[at + 4..];
        let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let line = digits(after);
        let column = after[line..]
            .strip_prefix(':')
            .map(digits)
            .filter(|&n| n > 0);
        match column {
            Some(column) if line > 0 => {
                let start = rest[..at]
                    .rfind(|c: char| c.is_whitespace() || c == '\'')
                    .map_or(0, |i| i + 1);
                out.push_str(&rest[..start]);
                out.push_str("<frame>");
                rest = &after[line + 1 + column..];
            }
            _ => {
                out.push_str(&rest[..at + 4]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
