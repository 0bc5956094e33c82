//! Resolve the roles of an ancestor chain of method names.
//!
//! Resolution works on names only. The caller supplies one [`LevelNames`] per type in the chain, most-derived
//! first, and gets back a [`Resolution`] of indices into that input; binding the indices to callable bodies is
//! the runtime's job.
//!
//! ## Rules
//! - Within one level, a name matching two roles is a naming ambiguity, a single-valued role claimed by two
//!   distinct names is an error, and the same name may not be declared twice.
//! - Setups chain from the least-derived level to the most-derived one; teardowns run in the reverse order.
//! - Only the most-derived action runs. Less-derived actions are discarded whether or not they share its name;
//!   the same holds for the example provider.
//! - Assertions accumulate across every level. Their order carries no meaning.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::roles::{RoleId, classify_name};

/// The declared method names of one type in the ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelNames<'a> {
    pub type_name: &'a str,
    /// Declaration order.
    pub methods: Vec<&'a str>,
}

impl<'a> LevelNames<'a> {
    pub fn new(type_name: &'a str, methods: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            type_name,
            methods: methods.into_iter().collect(),
        }
    }
}

/// Position of a method in the resolver input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodIndex {
    /// Index into the level slice (0 = most-derived).
    pub level: usize,
    /// Index into that level's `methods`.
    pub method: usize,
}

/// Which methods run, per role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Least-derived first.
    pub setups: Vec<MethodIndex>,
    pub action: Option<MethodIndex>,
    pub assertions: Vec<MethodIndex>,
    /// Most-derived first.
    pub teardowns: Vec<MethodIndex>,
    pub examples: Option<MethodIndex>,
    /// Role methods that lost to a more-derived declaration.
    pub discarded: Vec<(RoleId, MethodIndex)>,
}

/// A configuration error in a spec's method names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    NamingAmbiguity {
        type_name: String,
        method: String,
        roles: Vec<RoleId>,
    },
    TooManySpecialMethods {
        type_name: String,
        role: RoleId,
        methods: Vec<String>,
    },
    DuplicateMethod {
        type_name: String,
        method: String,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NamingAmbiguity {
                type_name,
                method,
                roles,
            } => {
                let roles: Vec<&str> = roles.iter().map(|r| crate::roles::as_str(*r)).collect();
                write!(
                    f,
                    "method `{type_name}::{method}` is ambiguously named: it matches the {} roles",
                    roles.join(" and ")
                )
            }
            ResolveError::TooManySpecialMethods {
                type_name,
                role,
                methods,
            } => write!(
                f,
                "`{type_name}` declares more than one {role} method: {}",
                methods.join(", ")
            ),
            ResolveError::DuplicateMethod { type_name, method } => {
                write!(f, "`{type_name}` declares `{method}` more than once")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

#[derive(Default)]
struct LevelRoles {
    single: BTreeMap<RoleId, MethodIndex>,
    assertions: Vec<MethodIndex>,
}

fn resolve_level(level_index: usize, level: &LevelNames<'_>) -> Result<LevelRoles, ResolveError> {
    let mut seen = HashSet::new();
    let mut claimed: BTreeMap<RoleId, Vec<usize>> = BTreeMap::new();
    let mut out = LevelRoles::default();

    for (method_index, name) in level.methods.iter().enumerate() {
        if !seen.insert(*name) {
            return Err(ResolveError::DuplicateMethod {
                type_name: level.type_name.to_string(),
                method: name.to_string(),
            });
        }
        let role = classify_name(name).map_err(|roles| ResolveError::NamingAmbiguity {
            type_name: level.type_name.to_string(),
            method: name.to_string(),
            roles,
        })?;
        let index = MethodIndex {
            level: level_index,
            method: method_index,
        };
        match role {
            None => {}
            Some(RoleId::Assertion) => out.assertions.push(index),
            Some(role) => claimed.entry(role).or_default().push(method_index),
        }
    }

    for (role, methods) in claimed {
        if let [method] = methods.as_slice() {
            out.single.insert(
                role,
                MethodIndex {
                    level: level_index,
                    method: *method,
                },
            );
        } else {
            return Err(ResolveError::TooManySpecialMethods {
                type_name: level.type_name.to_string(),
                role,
                methods: methods.iter().map(|m| level.methods[*m].to_string()).collect(),
            });
        }
    }
    Ok(out)
}

/// Resolve an ancestor chain (most-derived first) into the methods that run.
///
/// ## Errors
/// - The first [`ResolveError`] found, scanning from the most-derived level.
///
/// ## Examples
/// ```rust
/// use specrun_core::resolve::{resolve, LevelNames};
///
/// let derived = LevelNames::new("Spec", ["context", "because", "it"]);
/// let base = LevelNames::new("Shared", ["context", "superclass_because", "it"]);
/// let resolution = resolve(&[derived, base]).unwrap();
///
/// assert_eq!(resolution.setups.len(), 2);
/// assert_eq!(resolution.action.map(|a| a.level), Some(0));
/// assert_eq!(resolution.assertions.len(), 2);
/// ```
pub fn resolve(levels: &[LevelNames<'_>]) -> Result<Resolution, ResolveError> {
    let per_level = levels
        .iter()
        .enumerate()
        .map(|(i, level)| resolve_level(i, level))
        .collect::<Result<Vec<_>, _>>()?;

    let mut resolution = Resolution::default();
    for roles in per_level.iter().rev() {
        if let Some(setup) = roles.single.get(&RoleId::Setup) {
            resolution.setups.push(*setup);
        }
    }
    for roles in &per_level {
        if let Some(teardown) = roles.single.get(&RoleId::Teardown) {
            resolution.teardowns.push(*teardown);
        }
        resolution.assertions.extend(roles.assertions.iter().copied());
        for role in [RoleId::Action, RoleId::ExampleProvider] {
            let Some(index) = roles.single.get(&role) else {
                continue;
            };
            let slot = match role {
                RoleId::Action => &mut resolution.action,
                _ => &mut resolution.examples,
            };
            if slot.is_none() {
                *slot = Some(*index);
            } else {
                resolution.discarded.push((role, *index));
            }
        }
    }
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(level: usize, method: usize) -> MethodIndex {
        MethodIndex { level, method }
    }

    #[test]
    fn test_single_level() {
        let level = LevelNames::new(
            "TestSpec",
            [
                "method_with_establish_in_the_name",
                "method_with_because_in_the_name",
                "method_with_should_in_the_name",
                "helper",
                "method_with_cleanup_in_the_name",
            ],
        );
        let resolution = resolve(&[level]).unwrap();
        assert_eq!(resolution.setups, vec![idx(0, 0)]);
        assert_eq!(resolution.action, Some(idx(0, 1)));
        assert_eq!(resolution.assertions, vec![idx(0, 2)]);
        assert_eq!(resolution.teardowns, vec![idx(0, 4)]);
        assert_eq!(resolution.examples, None);
    }

    #[test]
    fn test_inheritance_chain_order() {
        let derived = LevelNames::new("Spec", ["context", "because", "it", "cleanup"]);
        let base = LevelNames::new("SharedContext", ["context", "superclass_because", "it", "cleanup"]);
        let resolution = resolve(&[derived, base]).unwrap();

        assert_eq!(resolution.setups, vec![idx(1, 0), idx(0, 0)]);
        assert_eq!(resolution.action, Some(idx(0, 1)));
        assert_eq!(resolution.discarded, vec![(RoleId::Action, idx(1, 1))]);
        assert_eq!(resolution.assertions.len(), 2);
        assert_eq!(resolution.teardowns, vec![idx(0, 3), idx(1, 3)]);
    }

    #[test]
    fn test_inherited_action_used_when_derived_has_none() {
        let derived = LevelNames::new("Spec", ["it_works"]);
        let base = LevelNames::new("Base", ["because"]);
        let resolution = resolve(&[derived, base]).unwrap();
        assert_eq!(resolution.action, Some(idx(1, 0)));
    }

    #[test]
    fn test_most_derived_examples_win() {
        let derived = LevelNames::new("Spec", ["examples", "it"]);
        let base = LevelNames::new("Base", ["examples"]);
        let resolution = resolve(&[derived, base]).unwrap();
        assert_eq!(resolution.examples, Some(idx(0, 0)));
        assert_eq!(resolution.discarded, vec![(RoleId::ExampleProvider, idx(1, 0))]);
    }

    #[test]
    fn test_ambiguity_is_reported() {
        let level = LevelNames::new("AmbiguousMethods", ["this_has_both_should_and_cleanup_in_the_name"]);
        let err = resolve(&[level]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NamingAmbiguity {
                type_name: "AmbiguousMethods".to_string(),
                method: "this_has_both_should_and_cleanup_in_the_name".to_string(),
                roles: vec![RoleId::Assertion, RoleId::Teardown],
            }
        );
    }

    #[test]
    fn test_ambiguity_in_base_level_is_reported() {
        let derived = LevelNames::new("Spec", ["it"]);
        let base = LevelNames::new("Base", ["given_because"]);
        assert!(matches!(
            resolve(&[derived, base]),
            Err(ResolveError::NamingAmbiguity { .. })
        ));
    }

    #[test]
    fn test_too_many_special_methods() {
        for (name, methods) in [
            ("TooManyContexts", ["context", "establish"]),
            ("TooManyActions", ["because", "when"]),
            ("TooManyTeardowns", ["cleanup1", "cleanup2"]),
        ] {
            let err = resolve(&[LevelNames::new(name, methods)]).unwrap_err();
            assert!(
                matches!(err, ResolveError::TooManySpecialMethods { ref type_name, .. } if type_name == name),
                "{err}"
            );
        }
    }

    #[test]
    fn test_duplicate_method() {
        let err = resolve(&[LevelNames::new("Spec", ["it", "it"])]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`Spec` declares `it` more than once"
        );
    }

    #[test]
    fn test_many_assertions_are_fine() {
        let resolution = resolve(&[LevelNames::new("Spec", ["it_a", "it_b", "should_c"])]).unwrap();
        assert_eq!(resolution.assertions.len(), 3);
    }

    #[test]
    fn test_error_messages() {
        let err = ResolveError::NamingAmbiguity {
            type_name: "S".into(),
            method: "given_because".into(),
            roles: vec![RoleId::Setup, RoleId::Action],
        };
        assert_eq!(
            err.to_string(),
            "method `S::given_because` is ambiguously named: it matches the setup and action roles"
        );
    }
}
