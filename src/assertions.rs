//! Assertion helpers for spec methods.
//!
//! Two flavours, use whichever reads better in the spec:
//! - panicking helpers ([`assert_that`], [`assert_eq`], [`assert_ne`], [`fail`]) raise an [`AssertionFailure`]
//!   payload, which the engine classifies as `failed`;
//! - `Result` helpers ([`ensure`], [`ensure_eq`]) return a failure [`SpecError`] for use with `?`;
//! - macros ([`spec_assert!`](crate::spec_assert), [`spec_assert_eq!`](crate::spec_assert_eq)) take the same
//!   arguments as their std counterparts, custom message included, and raise an [`AssertionFailure`].
//!
//! Std `assert!`/`assert_eq!` panics are recognised by their default `assertion ...` message, so they count as
//! failures only without a custom message. `assert!(c, "msg")` panics with just `msg` and reports as `errored`;
//! use `spec_assert!(c, "msg")` instead. Every other panic or error is `errored`.

use std::fmt::Debug;
use std::panic::Location;

use crate::error::{Frame, Outcome, SpecError};

/// Panic payload raised by the panicking helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub message: String,
    pub location: Frame,
}

#[track_caller]
fn raise(message: String) -> ! {
    std::panic::panic_any(AssertionFailure {
        message,
        location: Frame::from_location(Location::caller()),
    })
}

/// Assert that a condition is true.
///
/// # Panics
///
/// Panics with an [`AssertionFailure`] if `condition` is false.
#[track_caller]
pub fn assert_that(condition: bool, message: &str) {
    if !condition {
        raise(message.to_string());
    }
}

/// Assert that two values are equal.
///
/// # Panics
///
/// Panics with an [`AssertionFailure`] if `left != right`.
#[track_caller]
pub fn assert_eq<T: PartialEq + Debug>(left: T, right: T) {
    if left != right {
        raise(format!(
            "assertion failed: left != right\n  left:  {:?}\n  right: {:?}",
            left, right
        ));
    }
}

/// Assert that two values are not equal.
///
/// # Panics
///
/// Panics with an [`AssertionFailure`] if `left == right`.
#[track_caller]
pub fn assert_ne<T: PartialEq + Debug>(left: T, right: T) {
    if left == right {
        raise(format!(
            "assertion failed: left == right\n  left:  {:?}\n  right: {:?}",
            left, right
        ));
    }
}

/// Explicitly fail with a message.
///
/// # Panics
///
/// Always panics with an [`AssertionFailure`] carrying `msg`.
#[track_caller]
pub fn fail(msg: impl Into<String>) -> ! {
    raise(msg.into())
}

/// Return a failure unless `condition` holds.
#[track_caller]
pub fn ensure(condition: bool, message: impl Into<String>) -> Outcome {
    if condition { Ok(()) } else { Err(SpecError::failure(message)) }
}

/// Return a failure unless `left == right`.
#[track_caller]
pub fn ensure_eq<T: PartialEq + Debug>(left: T, right: T) -> Outcome {
    if left == right {
        Ok(())
    } else {
        Err(SpecError::failure(format!(
            "assertion failed: left != right\n  left:  {:?}\n  right: {:?}",
            left, right
        )))
    }
}

/// `assert!` that raises an [`AssertionFailure`](crate::assertions::AssertionFailure), with or without a
/// custom message.
#[macro_export]
macro_rules! spec_assert {
    ($cond:expr $(,)?) => {
        $crate::assertions::assert_that($cond, concat!("assertion failed: ", stringify!($cond)))
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::assertions::fail(format!($($arg)+))
        }
    };
}

/// `assert_eq!` that raises an [`AssertionFailure`](crate::assertions::AssertionFailure).
#[macro_export]
macro_rules! spec_assert_eq {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left, right) => $crate::assertions::assert_eq(left, right),
        }
    };
    ($left:expr, $right:expr, $($arg:tt)+) => {
        match (&$left, &$right) {
            (left, right) => {
                if *left != *right {
                    $crate::assertions::fail(format!(
                        "{}\n  left:  {:?}\n  right: {:?}",
                        format_args!($($arg)+),
                        left,
                        right
                    ))
                }
            }
        }
    };
}
