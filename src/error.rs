//! Error types for spec execution and classification.
//!
//! Two families live here:
//! - [`SpecError`]: whatever a spec method raised (returned `Err`, or panicked). It is a *value* the engine
//!   records and reports, never something that propagates to the caller of a run.
//! - [`ClassifyError`]: a configuration problem in a spec's method names, found before anything runs. This one
//!   does propagate.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use miette::Diagnostic;
use serde::Serialize;
use specrun_core::{ResolveError, RoleId};
use thiserror::Error;

/// Result of invoking one spec method.
pub type Outcome = Result<(), SpecError>;

/// How the engine classifies a raised condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The assertion library's failure signal.
    Failure,
    /// Anything else.
    Error,
}

/// One extracted call frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Frame {
    pub fn from_location(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A condition raised by a spec method.
///
/// ## Notes
/// - `SpecError` does not implement [`std::error::Error`]; that keeps the blanket
///   `From<E: std::error::Error>` conversion coherent, so `?` works on any error type inside a spec method.
/// - The original error value is kept and reachable through [`SpecError::downcast_ref`].
#[derive(Clone, Serialize)]
pub struct SpecError {
    kind: ErrorKind,
    type_name: String,
    message: String,
    frames: Vec<Frame>,
    #[serde(skip)]
    source: Option<Arc<dyn StdError + Send + Sync + 'static>>,
}

fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

impl SpecError {
    fn new(kind: ErrorKind, type_name: impl Into<String>, message: impl Into<String>, frames: Vec<Frame>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
            message: message.into(),
            frames,
            source: None,
        }
    }

    /// Build an assertion failure at the caller's location.
    #[track_caller]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Failure,
            "AssertionFailure",
            message,
            vec![Frame::from_location(Location::caller())],
        )
    }

    /// Build a plain error at the caller's location.
    #[track_caller]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Error, "Error", message, vec![Frame::from_location(Location::caller())])
    }

    /// Convert a caught panic payload.
    ///
    /// `AssertionFailure` payloads and `assertion ...` messages (the std `assert!` family) become failures;
    /// anything else is an error.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>, location: Option<Frame>) -> Self {
        let frames: Vec<Frame> = location.into_iter().collect();
        let payload = match payload.downcast::<SpecError>() {
            Ok(err) => return *err,
            Err(other) => other,
        };
        let payload = match payload.downcast::<crate::assertions::AssertionFailure>() {
            Ok(failure) => {
                let frames = if frames.is_empty() { vec![failure.location.clone()] } else { frames };
                return Self::new(ErrorKind::Failure, "AssertionFailure", failure.message, frames);
            }
            Err(other) => other,
        };
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        if message.starts_with("assertion") {
            Self::new(ErrorKind::Failure, "AssertionFailure", message, frames)
        } else {
            Self::new(ErrorKind::Error, "panic", message, frames)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_failure(&self) -> bool {
        self.kind == ErrorKind::Failure
    }

    /// Short label of the raised type (`ParseIntError`, `AssertionFailure`, `panic`).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Borrow the original error if it was of type `T`.
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.source.as_deref()?.downcast_ref::<T>()
    }

    /// Render the error as report lines: the frames, then `Type: message` (one line per message line).
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.frames.iter().map(|frame| format!("at {frame}")).collect();
        let mut message_lines = self.message.lines();
        let first = message_lines.next().unwrap_or("");
        lines.push(format!("{}: {}", self.type_name, first));
        lines.extend(message_lines.map(str::to_string));
        lines
    }
}

impl<E> From<E> for SpecError
where
    E: StdError + Send + Sync + 'static,
{
    #[track_caller]
    fn from(err: E) -> Self {
        let mut spec_error = Self::new(
            ErrorKind::Error,
            short_type_name::<E>(),
            err.to_string(),
            vec![Frame::from_location(Location::caller())],
        );
        spec_error.source = Some(Arc::new(err));
        spec_error
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}

impl fmt::Debug for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecError")
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .field("message", &self.message)
            .field("frames", &self.frames)
            .finish()
    }
}

impl PartialEq for SpecError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.type_name == other.type_name
            && self.message == other.message
            && self.frames == other.frames
    }
}

/// Errors found while classifying a spec's methods. Nothing has run when one of these is returned.
#[derive(Debug, Error, Diagnostic)]
pub enum ClassifyError {
    #[error("naming ambiguity in `{spec}`: {source}")]
    #[diagnostic(
        code(specrun::naming_ambiguity),
        help("rename the method so its words match exactly one of the setup, action, assertion or teardown patterns")
    )]
    NamingAmbiguity { spec: String, source: ResolveError },

    #[error("too many special methods in `{spec}`: {source}")]
    #[diagnostic(
        code(specrun::too_many_special_methods),
        help("a type may declare at most one setup, one action, one teardown and one example provider")
    )]
    TooManySpecialMethods { spec: String, source: ResolveError },

    #[error("duplicate method in `{spec}`: {source}")]
    #[diagnostic(code(specrun::duplicate_method))]
    DuplicateMethod { spec: String, source: ResolveError },

    #[error("`{spec}`: method `{method}` takes an example but no `examples` provider is declared")]
    #[diagnostic(code(specrun::missing_examples), help("add an `examples` method or drop the example parameter"))]
    MissingExamples { spec: String, method: String },

    #[error("`{spec}`: `{method}` {problem}")]
    #[diagnostic(code(specrun::examples_signature))]
    ExamplesSignature {
        spec: String,
        method: String,
        problem: &'static str,
    },
}

impl ClassifyError {
    pub(crate) fn from_resolve(spec: &str, source: ResolveError) -> Self {
        let spec = spec.to_string();
        match source {
            ResolveError::NamingAmbiguity { .. } => ClassifyError::NamingAmbiguity { spec, source },
            ResolveError::TooManySpecialMethods { .. } => ClassifyError::TooManySpecialMethods { spec, source },
            ResolveError::DuplicateMethod { .. } => ClassifyError::DuplicateMethod { spec, source },
        }
    }

    /// The role involved, when the error is about one.
    pub fn role(&self) -> Option<RoleId> {
        match self {
            ClassifyError::TooManySpecialMethods {
                source: ResolveError::TooManySpecialMethods { role, .. },
                ..
            } => Some(*role),
            ClassifyError::MissingExamples { .. } | ClassifyError::ExamplesSignature { .. } => {
                Some(RoleId::ExampleProvider)
            }
            _ => None,
        }
    }
}
