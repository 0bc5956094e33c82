//! Bind resolved roles to callable bodies.
//!
//! Name resolution itself lives in `specrun_core`; this module feeds it the declared names of a spec's ancestor
//! chain, checks the example-provider wiring, and keeps the bodies of the methods that run.

use std::fmt;

use specrun_core::{LevelNames, MethodIndex, readable_label, resolve};

use crate::definition::{Body, ExampleStepFn, ExamplesFn, StepFn, TypeDescriptor};
use crate::error::{ClassifyError, Outcome, SpecError};

pub(crate) enum Call<S, E> {
    Plain(StepFn<S>),
    WithExample(ExampleStepFn<S, E>),
}

impl<S, E> Call<S, E> {
    pub(crate) fn invoke(&self, instance: &mut S, example: Option<&E>) -> Outcome {
        match (self, example) {
            (Call::Plain(f), _) => f(instance),
            (Call::WithExample(f), Some(example)) => f(instance, example),
            (Call::WithExample(_), None) => Err(SpecError::error("method takes an example but none was supplied")),
        }
    }

    fn takes_example(&self) -> bool {
        matches!(self, Call::WithExample(_))
    }
}

/// A method selected to run.
pub struct BoundMethod<S, E> {
    /// The declaring type.
    pub owner: String,
    pub name: String,
    /// Human-readable label; see [`specrun_core::readable_label`].
    pub label: String,
    pub(crate) call: Call<S, E>,
}

impl<S, E> fmt::Debug for BoundMethod<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The methods of one spec that run, grouped by role.
pub struct RoleAssignment<S, E> {
    /// Least-derived first.
    pub setups: Vec<BoundMethod<S, E>>,
    pub action: Option<BoundMethod<S, E>>,
    pub assertions: Vec<BoundMethod<S, E>>,
    /// Most-derived first.
    pub teardowns: Vec<BoundMethod<S, E>>,
    pub(crate) examples: Option<ExamplesFn<E>>,
}

impl<S, E> fmt::Debug for RoleAssignment<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleAssignment")
            .field("setups", &self.setups)
            .field("action", &self.action)
            .field("assertions", &self.assertions)
            .field("teardowns", &self.teardowns)
            .finish_non_exhaustive()
    }
}

impl<S, E> RoleAssignment<S, E> {
    pub fn is_parametrised(&self) -> bool {
        self.examples.is_some()
    }

    pub fn setup_names(&self) -> Vec<&str> {
        self.setups.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn action_name(&self) -> Option<&str> {
        self.action.as_ref().map(|m| m.name.as_str())
    }

    pub fn assertion_names(&self) -> Vec<&str> {
        self.assertions.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn teardown_names(&self) -> Vec<&str> {
        self.teardowns.iter().map(|m| m.name.as_str()).collect()
    }

    fn steps(&self) -> impl Iterator<Item = &BoundMethod<S, E>> {
        self.setups
            .iter()
            .chain(self.action.iter())
            .chain(self.assertions.iter())
            .chain(self.teardowns.iter())
    }
}

/// Classify a spec's ancestor chain (most-derived first).
///
/// ## Errors
/// - Any naming problem [`specrun_core::resolve`] reports, wrapped with the spec's name.
/// - [`ClassifyError::ExamplesSignature`] when `examples` is declared as an ordinary method.
/// - [`ClassifyError::MissingExamples`] when a running method takes an example and no level provides any.
pub fn classify<S, E>(spec: &str, ancestry: &[TypeDescriptor<S, E>]) -> Result<RoleAssignment<S, E>, ClassifyError> {
    let levels: Vec<LevelNames<'_>> = ancestry
        .iter()
        .map(|level| LevelNames::new(level.name(), level.method_names()))
        .collect();
    let resolution = resolve(&levels).map_err(|source| ClassifyError::from_resolve(spec, source))?;

    let bind = |index: MethodIndex| -> Result<BoundMethod<S, E>, ClassifyError> {
        let level = &ancestry[index.level];
        let method = &level.methods()[index.method];
        let call = match &method.body {
            Body::Step(f) => Call::Plain(f.clone()),
            Body::WithExample(f) => Call::WithExample(f.clone()),
            Body::Examples(_) => {
                return Err(ClassifyError::ExamplesSignature {
                    spec: spec.to_string(),
                    method: method.name.clone(),
                    problem: "is an example provider but does not use the `examples` name",
                });
            }
        };
        Ok(BoundMethod {
            owner: level.name().to_string(),
            name: method.name.clone(),
            label: readable_label(&method.name),
            call,
        })
    };

    let examples = match resolution.examples {
        None => None,
        Some(index) => {
            let method = &ancestry[index.level].methods()[index.method];
            match &method.body {
                Body::Examples(f) => Some(f.clone()),
                _ => {
                    return Err(ClassifyError::ExamplesSignature {
                        spec: spec.to_string(),
                        method: method.name.clone(),
                        problem: "must be an associated function without a receiver that returns the examples",
                    });
                }
            }
        }
    };

    let assignment = RoleAssignment {
        setups: resolution.setups.iter().map(|i| bind(*i)).collect::<Result<_, _>>()?,
        action: resolution.action.map(&bind).transpose()?,
        assertions: resolution.assertions.iter().map(|i| bind(*i)).collect::<Result<_, _>>()?,
        teardowns: resolution.teardowns.iter().map(|i| bind(*i)).collect::<Result<_, _>>()?,
        examples,
    };

    if assignment.examples.is_none() {
        if let Some(method) = assignment.steps().find(|m| m.call.takes_example()) {
            return Err(ClassifyError::MissingExamples {
                spec: spec.to_string(),
                method: method.name.clone(),
            });
        }
    }

    for (role, index) in &resolution.discarded {
        tracing::debug!(
            spec,
            role = %role,
            owner = ancestry[index.level].name(),
            method = ancestry[index.level].methods()[index.method].name.as_str(),
            "overridden by a more-derived declaration"
        );
    }
    Ok(assignment)
}
