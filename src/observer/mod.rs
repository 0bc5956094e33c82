//! The observer protocol: the events a run emits, and who listens.
//!
//! Every callback has a no-op default, so an observer implements only what it cares about. Events arrive in a
//! fixed order per context:
//!
//! ```text
//! context_started
//!   (context_errored)?            setup or action failed; no assertions follow
//!   (assertion_started  assertion_passed | assertion_failed | assertion_errored)*
//!   (context_errored)?            teardown failed
//! context_ended
//! ```
//!
//! bracketed by one `suite_started`/`suite_ended` pair per run. `unexpected_error` may arrive between contexts.

mod composite;

pub use composite::Composite;

use serde::{Serialize, Serializer};
use specrun_core::RoleId;

use crate::error::SpecError;

/// A run of one or more specs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteInfo {
    pub name: String,
    pub spec_count: usize,
}

/// One execution of a spec: a fresh instance, optionally bound to one example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextInfo {
    pub spec_name: String,
    /// Debug rendering of the example, for parametrised specs.
    pub example: Option<String>,
}

impl ContextInfo {
    pub fn new(spec_name: impl Into<String>, example: Option<String>) -> Self {
        Self {
            spec_name: spec_name.into(),
            example,
        }
    }

    /// `Name`, or `Name -> example` for a parametrised context.
    pub fn display_name(&self) -> String {
        match &self.example {
            Some(example) => format!("{} -> {}", self.spec_name, example),
            None => self.spec_name.clone(),
        }
    }
}

/// One assertion method of a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionInfo {
    /// The type that declared it.
    pub owner: String,
    pub method: String,
    pub label: String,
}

impl AssertionInfo {
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.owner, self.method)
    }
}

fn serialize_role<S: Serializer>(role: &RoleId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(specrun_core::roles::as_str(*role))
}

/// A setup, action or teardown that raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextFailure {
    #[serde(serialize_with = "serialize_role")]
    pub role: RoleId,
    pub error: SpecError,
}

/// Receives run events.
pub trait Observer {
    /// Whether this observer saw anything that fails the run.
    fn failed(&self) -> bool {
        false
    }

    fn suite_started(&mut self, _suite: &SuiteInfo) {}
    fn suite_ended(&mut self, _suite: &SuiteInfo) {}

    fn context_started(&mut self, _context: &ContextInfo) {}
    fn context_ended(&mut self, _context: &ContextInfo) {}
    fn context_errored(&mut self, _context: &ContextInfo, _failure: &ContextFailure) {}

    fn assertion_started(&mut self, _assertion: &AssertionInfo) {}
    fn assertion_passed(&mut self, _assertion: &AssertionInfo) {}
    fn assertion_failed(&mut self, _assertion: &AssertionInfo, _error: &SpecError) {}
    fn assertion_errored(&mut self, _assertion: &AssertionInfo, _error: &SpecError) {}

    /// An error outside any context: the instance factory or the example provider raised.
    fn unexpected_error(&mut self, _error: &SpecError) {}
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn failed(&self) -> bool {
        (**self).failed()
    }
    fn suite_started(&mut self, suite: &SuiteInfo) {
        (**self).suite_started(suite)
    }
    fn suite_ended(&mut self, suite: &SuiteInfo) {
        (**self).suite_ended(suite)
    }
    fn context_started(&mut self, context: &ContextInfo) {
        (**self).context_started(context)
    }
    fn context_ended(&mut self, context: &ContextInfo) {
        (**self).context_ended(context)
    }
    fn context_errored(&mut self, context: &ContextInfo, failure: &ContextFailure) {
        (**self).context_errored(context, failure)
    }
    fn assertion_started(&mut self, assertion: &AssertionInfo) {
        (**self).assertion_started(assertion)
    }
    fn assertion_passed(&mut self, assertion: &AssertionInfo) {
        (**self).assertion_passed(assertion)
    }
    fn assertion_failed(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        (**self).assertion_failed(assertion, error)
    }
    fn assertion_errored(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        (**self).assertion_errored(assertion, error)
    }
    fn unexpected_error(&mut self, error: &SpecError) {
        (**self).unexpected_error(error)
    }
}
