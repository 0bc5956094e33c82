//! Fan every event out to an ordered list of observers plus an aggregator.

use std::panic::{self, AssertUnwindSafe};

use super::{AssertionInfo, ContextFailure, ContextInfo, Observer, SuiteInfo};
use crate::error::SpecError;
use crate::view_model::SuiteViewModel;

/// Forwards each call to every registered observer in registration order, then to the aggregator.
///
/// A panicking observer does not stop delivery: the panic is logged, the run is marked failed, and the call still
/// reaches the remaining observers and the aggregator.
pub struct Composite<A: Observer = SuiteViewModel> {
    observers: Vec<Box<dyn Observer>>,
    aggregator: A,
    observer_panics: usize,
}

impl Composite {
    pub fn new(observers: Vec<Box<dyn Observer>>) -> Self {
        Self::with_aggregator(observers, SuiteViewModel::default())
    }
}

impl<A: Observer> Composite<A> {
    pub fn with_aggregator(observers: Vec<Box<dyn Observer>>, aggregator: A) -> Self {
        Self {
            observers,
            aggregator,
            observer_panics: 0,
        }
    }

    pub fn push(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn aggregator(&self) -> &A {
        &self.aggregator
    }

    pub fn into_aggregator(self) -> A {
        self.aggregator
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// How many observer calls panicked so far.
    pub fn observer_panics(&self) -> usize {
        self.observer_panics
    }

    fn dispatch(&mut self, event: &'static str, mut call: impl FnMut(&mut dyn Observer)) {
        for (index, observer) in self.observers.iter_mut().enumerate() {
            if panic::catch_unwind(AssertUnwindSafe(|| call(observer.as_mut()))).is_err() {
                self.observer_panics += 1;
                tracing::error!(event, observer = index, "observer panicked; delivering to the rest");
            }
        }
        if panic::catch_unwind(AssertUnwindSafe(|| call(&mut self.aggregator))).is_err() {
            self.observer_panics += 1;
            tracing::error!(event, "aggregator panicked");
        }
    }
}

impl<A: Observer> Observer for Composite<A> {
    fn failed(&self) -> bool {
        self.observer_panics > 0 || self.aggregator.failed() || self.observers.iter().any(|o| o.failed())
    }

    fn suite_started(&mut self, suite: &SuiteInfo) {
        self.dispatch("suite_started", |o| o.suite_started(suite));
    }

    fn suite_ended(&mut self, suite: &SuiteInfo) {
        self.dispatch("suite_ended", |o| o.suite_ended(suite));
    }

    fn context_started(&mut self, context: &ContextInfo) {
        self.dispatch("context_started", |o| o.context_started(context));
    }

    fn context_ended(&mut self, context: &ContextInfo) {
        self.dispatch("context_ended", |o| o.context_ended(context));
    }

    fn context_errored(&mut self, context: &ContextInfo, failure: &ContextFailure) {
        self.dispatch("context_errored", |o| o.context_errored(context, failure));
    }

    fn assertion_started(&mut self, assertion: &AssertionInfo) {
        self.dispatch("assertion_started", |o| o.assertion_started(assertion));
    }

    fn assertion_passed(&mut self, assertion: &AssertionInfo) {
        self.dispatch("assertion_passed", |o| o.assertion_passed(assertion));
    }

    fn assertion_failed(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.dispatch("assertion_failed", |o| o.assertion_failed(assertion, error));
    }

    fn assertion_errored(&mut self, assertion: &AssertionInfo, error: &SpecError) {
        self.dispatch("assertion_errored", |o| o.assertion_errored(assertion, error));
    }

    fn unexpected_error(&mut self, error: &SpecError) {
        self.dispatch("unexpected_error", |o| o.unexpected_error(error));
    }
}
