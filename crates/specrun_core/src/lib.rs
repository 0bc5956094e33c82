//! Provide the role vocabulary and pure, name-only method resolution shared by the `specrun` runtime and its
//! `#[spec]` macro.
//!
//! This crate is intentionally small and dependency-free. It answers two questions about method *names*, never
//! about method bodies:
//! - which role (setup, action, assertion, teardown, example provider) does a name belong to, and
//! - given an ancestor chain of declared names, which of them run, and in what order.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, and no runtime types.
//! - The runtime binds the [`resolve::Resolution`] produced here to real method bodies; the macro uses
//!   [`roles::role_matches`] to decide which methods of an `impl` block are worth registering.

pub mod naming;
pub mod resolve;
pub mod roles;

pub use naming::{readable_label, split_words};
pub use resolve::{LevelNames, MethodIndex, Resolution, ResolveError, resolve};
pub use roles::{Cardinality, RoleId, RoleInfo, ROLES, classify_name, role_matches};
