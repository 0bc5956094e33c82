//! The execution engine: run classified specs and narrate the run to an observer.
//!
//! Each context moves through a fixed lifecycle:
//!
//! ```text
//! Created -> Instantiated -> SetupRan -> ActionRan -> AssertionsRan -> TeardownRan -> Done
//!                               |           |                            ^
//!                               +-----------+---------> Errored ---------+
//! ```
//!
//! A setup or action that raises moves the context to `Errored`: no assertions run, but teardown always does.
//! Nothing a spec method raises escapes the engine; it is reported and the run moves on.

use std::fmt::Debug;

use specrun_core::RoleId;

use crate::catch::invoke;
use crate::classify::{BoundMethod, RoleAssignment, classify};
use crate::definition::SpecDefinition;
use crate::error::{ClassifyError, SpecError};
use crate::observer::{AssertionInfo, ContextFailure, ContextInfo, Observer, SuiteInfo};

/// Lifecycle of one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextState {
    Created,
    Instantiated,
    SetupRan,
    ActionRan,
    AssertionsRan,
    Errored,
    TeardownRan,
    Done,
}

impl ContextState {
    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_advance_to(self, next: ContextState) -> bool {
        use ContextState::*;
        matches!(
            (self, next),
            (Created, Instantiated)
                | (Instantiated, SetupRan)
                | (SetupRan, ActionRan)
                | (SetupRan, Errored)
                | (ActionRan, AssertionsRan)
                | (ActionRan, Errored)
                | (AssertionsRan, TeardownRan)
                | (Errored, TeardownRan)
                | (TeardownRan, Done)
        )
    }
}

/// A spec that can be classified and run.
pub trait RunnableSpec {
    fn name(&self) -> &str;

    /// Classify the spec's methods.
    ///
    /// ## Errors
    /// - [`ClassifyError`] for any naming or wiring problem. Nothing runs.
    fn prepare(&self) -> Result<Box<dyn PreparedSpec + '_>, ClassifyError>;
}

/// A classified spec, ready to run.
pub trait PreparedSpec {
    fn name(&self) -> &str;

    /// Run every context of the spec.
    fn execute(&self, observer: &mut dyn Observer);
}

/// An ordered collection of specs run as one unit.
pub struct Suite {
    name: String,
    specs: Vec<Box<dyn RunnableSpec>>,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new("specs")
    }
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specs: Vec::new(),
        }
    }

    pub fn with(mut self, spec: impl RunnableSpec + 'static) -> Self {
        self.push(spec);
        self
    }

    pub fn push(&mut self, spec: impl RunnableSpec + 'static) {
        self.specs.push(Box::new(spec));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<S: 'static, E: Debug + 'static> RunnableSpec for SpecDefinition<S, E> {
    fn name(&self) -> &str {
        SpecDefinition::name(self)
    }

    fn prepare(&self) -> Result<Box<dyn PreparedSpec + '_>, ClassifyError> {
        let assignment = classify(self.name(), self.ancestry())?;
        Ok(Box::new(Prepared {
            definition: self,
            assignment,
        }))
    }
}

struct Prepared<'a, S, E> {
    definition: &'a SpecDefinition<S, E>,
    assignment: RoleAssignment<S, E>,
}

impl<S, E: Debug> PreparedSpec for Prepared<'_, S, E> {
    fn name(&self) -> &str {
        self.definition.name()
    }

    fn execute(&self, observer: &mut dyn Observer) {
        let span = tracing::debug_span!("spec", name = self.name());
        let _enter = span.enter();

        let Some(provider) = &self.assignment.examples else {
            self.run_context(None, observer);
            return;
        };
        let mut examples = match invoke(|| Ok(provider())) {
            Ok(examples) => examples,
            Err(err) => {
                observer.unexpected_error(&err);
                return;
            }
        };
        loop {
            match invoke(|| Ok(examples.next())) {
                Ok(Some(example)) => self.run_context(Some(&example), observer),
                Ok(None) => break,
                Err(err) => {
                    observer.unexpected_error(&err);
                    break;
                }
            }
        }
    }
}

/// State tracking for one context.
struct ContextRun<'c> {
    context: &'c ContextInfo,
    state: ContextState,
}

impl ContextRun<'_> {
    fn advance(&mut self, next: ContextState) {
        debug_assert!(self.state.can_advance_to(next), "{:?} -> {:?}", self.state, next);
        tracing::debug!(context = %self.context.display_name(), from = ?self.state, to = ?next, "transition");
        self.state = next;
    }

    fn fail(&self, role: RoleId, error: SpecError, observer: &mut dyn Observer) {
        tracing::debug!(context = %self.context.display_name(), %role, %error, "context failure");
        observer.context_errored(self.context, &ContextFailure { role, error });
    }
}

impl<S, E: Debug> Prepared<'_, S, E> {
    fn run_steps(
        &self,
        steps: &[BoundMethod<S, E>],
        instance: &mut S,
        example: Option<&E>,
    ) -> Result<(), SpecError> {
        steps
            .iter()
            .try_for_each(|step| invoke(|| step.call.invoke(instance, example)))
    }

    fn run_context(&self, example: Option<&E>, observer: &mut dyn Observer) {
        let mut instance = match invoke(|| Ok(self.definition.create())) {
            Ok(instance) => instance,
            Err(err) => {
                observer.unexpected_error(&err);
                return;
            }
        };
        let context = ContextInfo::new(self.name(), example.map(|e| format!("{e:?}")));
        let mut run = ContextRun {
            context: &context,
            state: ContextState::Created,
        };
        run.advance(ContextState::Instantiated);
        observer.context_started(&context);

        'body: {
            let setup = self.run_steps(&self.assignment.setups, &mut instance, example);
            run.advance(ContextState::SetupRan);
            if let Err(err) = setup {
                run.fail(RoleId::Setup, err, observer);
                run.advance(ContextState::Errored);
                break 'body;
            }

            let action = self.run_steps(self.assignment.action.as_slice(), &mut instance, example);
            run.advance(ContextState::ActionRan);
            if let Err(err) = action {
                run.fail(RoleId::Action, err, observer);
                run.advance(ContextState::Errored);
                break 'body;
            }

            for assertion in &self.assignment.assertions {
                let info = AssertionInfo {
                    owner: assertion.owner.clone(),
                    method: assertion.name.clone(),
                    label: assertion.label.clone(),
                };
                observer.assertion_started(&info);
                match invoke(|| assertion.call.invoke(&mut instance, example)) {
                    Ok(()) => observer.assertion_passed(&info),
                    Err(err) if err.is_failure() => observer.assertion_failed(&info, &err),
                    Err(err) => observer.assertion_errored(&info, &err),
                }
            }
            run.advance(ContextState::AssertionsRan);
        }

        for teardown in &self.assignment.teardowns {
            if let Err(err) = invoke(|| teardown.call.invoke(&mut instance, example)) {
                run.fail(RoleId::Teardown, err, observer);
            }
        }
        run.advance(ContextState::TeardownRan);

        observer.context_ended(&context);
        run.advance(ContextState::Done);
    }
}

fn run_prepared(name: &str, prepared: &[Box<dyn PreparedSpec + '_>], observer: &mut dyn Observer) {
    let suite = SuiteInfo {
        name: name.to_string(),
        spec_count: prepared.len(),
    };
    observer.suite_started(&suite);
    for spec in prepared {
        spec.execute(observer);
    }
    observer.suite_ended(&suite);
}

fn prepare_all<'a>(
    specs: impl Iterator<Item = &'a dyn RunnableSpec>,
) -> Result<Vec<Box<dyn PreparedSpec + 'a>>, ClassifyError> {
    specs
        .map(|spec| spec.prepare())
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|err| tracing::warn!(%err, "classification failed; nothing was run"))
}

/// Run every spec of `suite`.
///
/// All specs are classified before the first event. Once running, nothing a spec raises is returned; it is
/// reported to `observer` instead.
///
/// ## Errors
/// - The first [`ClassifyError`]. No observer call has been made.
pub fn run_suite(suite: &Suite, observer: &mut dyn Observer) -> Result<(), ClassifyError> {
    let prepared = prepare_all(suite.specs.iter().map(|spec| -> &dyn RunnableSpec { spec.as_ref() }))?;
    run_prepared(&suite.name, &prepared, observer);
    Ok(())
}

/// Run one spec as a suite of its own.
///
/// ## Errors
/// - [`ClassifyError`] if the spec's methods cannot be classified. No observer call has been made.
pub fn run(spec: &dyn RunnableSpec, observer: &mut dyn Observer) -> Result<(), ClassifyError> {
    let prepared = prepare_all(std::iter::once(spec))?;
    run_prepared(spec.name(), &prepared, observer);
    Ok(())
}
