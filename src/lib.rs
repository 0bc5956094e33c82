#![forbid(unsafe_code)]
//! Convention-based spec runner.
//!
//! A spec is an ordinary type whose methods are classified by name: *setup* (`establish`, `context`, `given`),
//! *action* (`because`, `when`, `since`, `after`), *assertion* (`it`, `should`, `will`, `must`, `then`) and
//! *teardown* (`cleanup`). Each run creates a fresh instance, runs setup, action and every assertion, and always
//! runs teardown. An `examples` provider runs the whole sequence once per example.
//!
//! ```rust
//! use specrun::{Spec, spec_assert_eq};
//!
//! #[derive(Default)]
//! struct WhenAddingNumbers {
//!     numbers: Vec<i32>,
//!     total: i32,
//! }
//!
//! #[specrun::spec]
//! impl WhenAddingNumbers {
//!     fn given_some_numbers(&mut self) {
//!         self.numbers = vec![1, 2, 3];
//!     }
//!
//!     fn because_we_add_them(&mut self) {
//!         self.total = self.numbers.iter().sum();
//!     }
//!
//!     fn it_should_return_six(&self) {
//!         spec_assert_eq!(self.total, 6, "sum of {:?}", self.numbers);
//!     }
//! }
//!
//! let mut results = specrun::SuiteViewModel::default();
//! specrun::run(&WhenAddingNumbers::definition(), &mut results).unwrap();
//! assert_eq!(results.assertions().count(), 1);
//! ```
//!
//! ## Panic Policy
//!
//! - **Library code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Spec code**: panics are expected; the engine catches them and reports them as failures or errors. Use
//!   [`spec_assert!`] and [`spec_assert_eq!`] for assertions with a custom message: a std `assert!(c, "msg")`
//!   panic carries only `msg` and is reported as an error.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

extern crate self as specrun;

pub mod assertions;
pub mod catch;
pub mod classify;
pub mod cli;
pub mod definition;
pub mod engine;
pub mod error;
pub mod observer;
pub mod output;
pub mod reporting;
pub mod view_model;

pub use catch::{Caught, catch, catch_with};
pub use classify::{RoleAssignment, classify};
pub use definition::{IntoOutcome, Spec, SpecDefinition, TypeDescriptor};
pub use engine::{ContextState, PreparedSpec, RunnableSpec, Suite, run, run_suite};
pub use error::{ClassifyError, ErrorKind, Frame, Outcome, SpecError};
pub use observer::{AssertionInfo, Composite, ContextFailure, ContextInfo, Observer, SuiteInfo};
pub use output::{CaptureError, Channel, OutputCapture};
pub use reporting::ReporterConfig;
pub use view_model::{AssertionStatus, AssertionViewModel, ContextViewModel, SuiteViewModel};

pub use specrun_core::RoleId;
pub use specrun_derive::spec;
