//! An in-memory record of a run, built by observing it.
//!
//! [`SuiteViewModel`] is the aggregator the composite observer feeds last. It answers summary queries (what
//! failed, what errored) after or during a run, and serializes to JSON for tooling.

use serde::Serialize;

use crate::error::{Frame, SpecError};
use crate::observer::{AssertionInfo, ContextFailure, ContextInfo, Observer, SuiteInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionStatus {
    Pending,
    Passed,
    Failed,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertionViewModel {
    pub label: String,
    pub method: String,
    pub owner: String,
    pub status: AssertionStatus,
    pub error: Option<SpecError>,
}

impl AssertionViewModel {
    fn new(info: &AssertionInfo) -> Self {
        Self {
            label: info.label.clone(),
            method: info.method.clone(),
            owner: info.owner.clone(),
            status: AssertionStatus::Pending,
            error: None,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        self.error.as_ref().map(SpecError::frames).unwrap_or_default()
    }

    /// The error rendered as report lines, empty when the assertion passed.
    pub fn error_summary(&self) -> Vec<String> {
        self.error.as_ref().map(SpecError::render_lines).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextViewModel {
    pub name: String,
    pub example: Option<String>,
    pub assertions: Vec<AssertionViewModel>,
    /// The first setup, action or teardown failure.
    pub error: Option<ContextFailure>,
    /// Failures after the first one, in order.
    pub secondary_errors: Vec<ContextFailure>,
    pub finished: bool,
}

impl ContextViewModel {
    fn new(info: &ContextInfo) -> Self {
        Self {
            name: info.display_name(),
            example: info.example.clone(),
            assertions: Vec::new(),
            error: None,
            secondary_errors: Vec::new(),
            finished: false,
        }
    }

    pub fn assertion_failures(&self) -> impl Iterator<Item = &AssertionViewModel> {
        self.assertions.iter().filter(|a| a.status == AssertionStatus::Failed)
    }

    pub fn assertion_errors(&self) -> impl Iterator<Item = &AssertionViewModel> {
        self.assertions.iter().filter(|a| a.status == AssertionStatus::Errored)
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
            || self
                .assertions
                .iter()
                .any(|a| matches!(a.status, AssertionStatus::Failed | AssertionStatus::Errored))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuiteViewModel {
    pub name: Option<String>,
    contexts: Vec<ContextViewModel>,
    unexpected_errors: Vec<SpecError>,
}

impl SuiteViewModel {
    pub fn contexts(&self) -> &[ContextViewModel] {
        &self.contexts
    }

    pub fn assertions(&self) -> impl Iterator<Item = &AssertionViewModel> {
        self.contexts.iter().flat_map(|c| c.assertions.iter())
    }

    pub fn assertion_failures(&self) -> impl Iterator<Item = &AssertionViewModel> {
        self.contexts.iter().flat_map(ContextViewModel::assertion_failures)
    }

    pub fn assertion_errors(&self) -> impl Iterator<Item = &AssertionViewModel> {
        self.contexts.iter().flat_map(ContextViewModel::assertion_errors)
    }

    /// Contexts whose setup, action or teardown raised.
    pub fn context_errors(&self) -> impl Iterator<Item = &ContextViewModel> {
        self.contexts.iter().filter(|c| c.error.is_some())
    }

    pub fn unexpected_errors(&self) -> &[SpecError] {
        &self.unexpected_errors
    }

    /// Render the run as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn current_context(&mut self) -> Option<&mut ContextViewModel> {
        self.contexts.last_mut().filter(|c| !c.finished)
    }

    fn assertion_mut(&mut self, info: &AssertionInfo) -> Option<&mut AssertionViewModel> {
        self.current_context()?
            .assertions
            .iter_mut()
            .rev()
            .find(|a| a.method == info.method && a.owner == info.owner)
    }

    fn settle(&mut self, info: &AssertionInfo, status: AssertionStatus, error: Option<&SpecError>) {
        match self.assertion_mut(info) {
            Some(assertion) => {
                assertion.status = status;
                assertion.error = error.cloned();
            }
            None => tracing::warn!(assertion = %info.full_name(), "outcome for an assertion that never started"),
        }
    }
}

impl Observer for SuiteViewModel {
    fn failed(&self) -> bool {
        !self.unexpected_errors.is_empty() || self.contexts.iter().any(ContextViewModel::failed)
    }

    fn suite_started(&mut self, suite: &SuiteInfo) {
        self.name = Some(suite.name.clone());
    }

    fn context_started(&mut self, context: &ContextInfo) {
        self.contexts.push(ContextViewModel::new(context));
    }

    fn context_ended(&mut self, _context: &ContextInfo) {
        if let Some(context) = self.current_context() {
            context.finished = true;
        }
    }

    fn context_errored(&mut self, _context: &ContextInfo, failure: &ContextFailure) {
        let Some(context) = self.current_context() else {
            tracing::warn!("context failure outside a context");
            return;
        };
        if context.error.is_none() {
            context.error = Some(failure.clone());
        } else {
            context.secondary_errors.push(failure.clone());
        }
    }

    fn assertion_started(&mut self, assertion: &AssertionInfo) {
        if let Some(context) = self.current_context() {
            context.assertions.push(AssertionViewModel::new(assertion));
        }
    }

    fn assertion_passed(&mut self, assertion: &AssertionInfo) {
        self.settle(assertion, AssertionStatus::Passed, None);
    }

    fn assertion_failed(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.settle(assertion, AssertionStatus::Failed, Some(error));
    }

    fn assertion_errored(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.settle(assertion, AssertionStatus::Errored, Some(error));
    }

    fn unexpected_error(&mut self, error: &SpecError) {
        self.unexpected_errors.push(error.clone());
    }
}
