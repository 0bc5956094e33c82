//! Define the method-role vocabulary for specs.
//!
//! This module is the single source of truth for the naming convention: a stable identifier ([`RoleId`]) plus a
//! const metadata table ([`ROLES`]) that records each role's keywords and cardinality. Existing specs depend on
//! the keyword spellings, so treat the table as a public contract.
//!
//! ## Notes
//! - Matching is **case-insensitive** and word-delimited (see [`crate::naming::split_words`]): `it` matches
//!   `it_returns_five` and `returnsIt`, but not `with_a_value`.
//! - [`RoleId::ExampleProvider`] matches only the exact name `examples`.
//!
//! ## Examples
//! ```rust
//! use specrun_core::roles::{self, RoleId};
//!
//! assert_eq!(roles::classify_name("because_we_add"), Ok(Some(RoleId::Action)));
//! assert_eq!(roles::classify_name("helper"), Ok(None));
//! assert!(roles::classify_name("should_cleanup").is_err());
//! ```

use std::fmt;

use crate::naming::{normalize_word, split_words};

/// Stable identifier for every method role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoleId {
    Setup,
    Action,
    Assertion,
    Teardown,
    ExampleProvider,
}

/// How many methods of a role one type level may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// At most one distinct name per type level.
    Single,
    /// Zero or more.
    Multi,
}

/// How a role's keywords are compared against a method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matching {
    /// Any word of the name equals a keyword.
    Word,
    /// The whole name equals a keyword.
    Exact,
}

/// Metadata for a role.
#[derive(Debug, Clone, Copy)]
pub struct RoleInfo {
    pub id: RoleId,
    pub canonical: &'static str,
    pub keywords: &'static [&'static str],
    pub cardinality: Cardinality,
    pub matching: Matching,
}

/// Registry of all roles, in execution order.
pub const ROLES: &[RoleInfo] = &[
    RoleInfo {
        id: RoleId::Setup,
        canonical: "setup",
        keywords: &["establish", "context", "given"],
        cardinality: Cardinality::Single,
        matching: Matching::Word,
    },
    RoleInfo {
        id: RoleId::Action,
        canonical: "action",
        keywords: &["because", "since", "when", "after"],
        cardinality: Cardinality::Single,
        matching: Matching::Word,
    },
    RoleInfo {
        id: RoleId::Assertion,
        canonical: "assertion",
        keywords: &["should", "it", "will", "must", "then"],
        cardinality: Cardinality::Multi,
        matching: Matching::Word,
    },
    RoleInfo {
        id: RoleId::Teardown,
        canonical: "teardown",
        keywords: &["cleanup"],
        cardinality: Cardinality::Single,
        matching: Matching::Word,
    },
    RoleInfo {
        id: RoleId::ExampleProvider,
        canonical: "examples",
        keywords: &["examples"],
        cardinality: Cardinality::Single,
        matching: Matching::Exact,
    },
];

/// Name of the example-provider method.
pub const EXAMPLES_METHOD: &str = "examples";

/// Look up metadata for a role.
pub fn info(id: RoleId) -> &'static RoleInfo {
    match id {
        RoleId::Setup => &ROLES[0],
        RoleId::Action => &ROLES[1],
        RoleId::Assertion => &ROLES[2],
        RoleId::Teardown => &ROLES[3],
        RoleId::ExampleProvider => &ROLES[4],
    }
}

/// Return the canonical spelling of a role.
pub fn as_str(id: RoleId) -> &'static str {
    info(id).canonical
}

impl RoleId {
    /// Whether one type level may declare more than one distinct name for this role.
    pub fn is_single_valued(self) -> bool {
        info(self).cardinality == Cardinality::Single
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(as_str(*self))
    }
}

/// Check whether a keyword is a role-indicating word for any word-matched role.
pub fn is_role_keyword(word: &str) -> bool {
    let word = normalize_word(word);
    ROLES
        .iter()
        .filter(|r| r.matching == Matching::Word)
        .any(|r| r.keywords.contains(&word.as_str()))
}

/// Return every role whose pattern matches `name`, in registry order.
///
/// ## Notes
/// - More than one entry means the name is ambiguous; see [`classify_name`].
pub fn role_matches(name: &str) -> Vec<RoleId> {
    let words: Vec<String> = split_words(name).iter().map(|w| normalize_word(w)).collect();
    ROLES
        .iter()
        .filter(|role| match role.matching {
            Matching::Exact => role.keywords.iter().any(|k| name.eq_ignore_ascii_case(k)),
            Matching::Word => words.iter().any(|w| role.keywords.contains(&w.as_str())),
        })
        .map(|role| role.id)
        .collect()
}

/// Classify a single method name.
///
/// ## Returns
/// - `Ok(Some(role))` when exactly one role matches.
/// - `Ok(None)` when the name carries no role (an ordinary helper method).
/// - `Err(roles)` with every matching role when the name is ambiguous.
pub fn classify_name(name: &str) -> Result<Option<RoleId>, Vec<RoleId>> {
    let matches = role_matches(name);
    match matches.as_slice() {
        [] => Ok(None),
        [role] => Ok(Some(*role)),
        _ => Err(matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_matches_ids() {
        for role in ROLES {
            assert_eq!(info(role.id).id, role.id);
        }
    }

    #[test]
    fn test_every_keyword_classifies_to_its_role() {
        for role in ROLES {
            for keyword in role.keywords {
                assert_eq!(classify_name(keyword), Ok(Some(role.id)), "keyword {keyword}");
            }
        }
    }

    #[test]
    fn test_alternate_names() {
        assert_eq!(classify_name("has_context_in_the_name"), Ok(Some(RoleId::Setup)));
        assert_eq!(classify_name("has_given_in_the_name"), Ok(Some(RoleId::Setup)));
        assert_eq!(classify_name("has_when_in_the_name"), Ok(Some(RoleId::Action)));
        assert_eq!(classify_name("has_since_in_the_name"), Ok(Some(RoleId::Action)));
        assert_eq!(classify_name("has_after_in_the_name"), Ok(Some(RoleId::Action)));
        assert_eq!(classify_name("has_it_in_the_name"), Ok(Some(RoleId::Assertion)));
        assert_eq!(classify_name("has_must_in_the_name"), Ok(Some(RoleId::Assertion)));
        assert_eq!(classify_name("has_will_in_the_name"), Ok(Some(RoleId::Assertion)));
        assert_eq!(classify_name("then_it_is_empty"), Ok(Some(RoleId::Assertion)));
    }

    #[test]
    fn test_word_boundaries() {
        // "with" contains "it", "method" contains nothing
        assert_eq!(classify_name("method_with_establish_in_the_name"), Ok(Some(RoleId::Setup)));
        assert_eq!(classify_name("method_with_because_in_the_name"), Ok(Some(RoleId::Action)));
        assert_eq!(classify_name("whenever_possible"), Ok(None));
    }

    #[test]
    fn test_case_insensitive_and_camel_case() {
        assert_eq!(classify_name("ESTABLISH"), Ok(Some(RoleId::Setup)));
        assert_eq!(classify_name("itShouldWork"), Ok(Some(RoleId::Assertion)));
        assert_eq!(classify_name("BecauseWeRun"), Ok(Some(RoleId::Action)));
    }

    #[test]
    fn test_trailing_digits_are_ignored() {
        assert_eq!(classify_name("cleanup1"), Ok(Some(RoleId::Teardown)));
        assert_eq!(classify_name("cleanup_2"), Ok(Some(RoleId::Teardown)));
    }

    #[test]
    fn test_same_role_twice_is_not_ambiguous() {
        assert_eq!(
            classify_name("this_has_both_context_and_establish_in_the_name"),
            Ok(Some(RoleId::Setup))
        );
        assert_eq!(classify_name("this_has_both_because_and_when_in_the_name"), Ok(Some(RoleId::Action)));
        assert_eq!(classify_name("this_has_both_should_and_it_in_the_name"), Ok(Some(RoleId::Assertion)));
    }

    #[test]
    fn test_ambiguous_names() {
        assert_eq!(
            classify_name("this_has_both_context_and_because_in_the_name"),
            Err(vec![RoleId::Setup, RoleId::Action])
        );
        assert_eq!(
            classify_name("this_has_both_should_and_cleanup_in_the_name"),
            Err(vec![RoleId::Assertion, RoleId::Teardown])
        );
        assert_eq!(
            classify_name("this_has_both_cleanup_and_establish_in_the_name"),
            Err(vec![RoleId::Setup, RoleId::Teardown])
        );
    }

    #[test]
    fn test_examples_is_exact() {
        assert_eq!(classify_name("examples"), Ok(Some(RoleId::ExampleProvider)));
        assert_eq!(classify_name("more_examples"), Ok(None));
    }

    #[test]
    fn test_single_valued() {
        assert!(RoleId::Setup.is_single_valued());
        assert!(!RoleId::Assertion.is_single_valued());
    }
}
