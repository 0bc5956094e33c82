//! Run spec code and turn whatever it raises into a value.
//!
//! Spec methods signal problems two ways: by returning `Err` or by panicking. [`invoke`] folds both into
//! a `Result<T, SpecError>` so the engine never unwinds through an observer.
//!
//! A process-wide panic hook is installed on first use. It wraps whatever hook was there before; while spec code
//! runs on the current thread it records the panic location instead of printing the default message, and
//! otherwise defers to the previous hook.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::error::{Frame, SpecError};

thread_local! {
    static QUIET_DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_LOCATION: RefCell<Option<Frame>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if QUIET_DEPTH.with(|depth| depth.get() > 0) {
                let frame = info.location().map(Frame::from_location);
                LAST_LOCATION.with(|slot| *slot.borrow_mut() = frame);
            } else {
                previous(info);
            }
        }));
    });
}

struct QuietScope;

impl QuietScope {
    fn enter() -> Self {
        QUIET_DEPTH.with(|depth| depth.set(depth.get() + 1));
        LAST_LOCATION.with(|slot| slot.borrow_mut().take());
        QuietScope
    }
}

impl Drop for QuietScope {
    fn drop(&mut self) {
        QUIET_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Run `f`, converting a panic into a [`SpecError`].
pub(crate) fn invoke<T>(f: impl FnOnce() -> Result<T, SpecError>) -> Result<T, SpecError> {
    install_panic_hook();
    let _quiet = QuietScope::enter();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let location = LAST_LOCATION.with(|slot| slot.borrow_mut().take());
            Err(SpecError::from_panic(payload, location))
        }
    }
}

/// What a closure run under [`catch`] raised.
#[derive(Debug)]
pub enum Caught<E> {
    /// It completed normally.
    Nothing,
    /// It returned `Err`.
    Raised(E),
    /// It panicked.
    Panicked(SpecError),
}

impl<E> Caught<E> {
    pub fn is_nothing(&self) -> bool {
        matches!(self, Caught::Nothing)
    }

    pub fn raised(&self) -> Option<&E> {
        match self {
            Caught::Raised(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_raised(self) -> Option<E> {
        match self {
            Caught::Raised(err) => Some(err),
            _ => None,
        }
    }

    pub fn panicked(&self) -> Option<&SpecError> {
        match self {
            Caught::Panicked(err) => Some(err),
            _ => None,
        }
    }
}

/// Run `f` and capture what it raised instead of propagating it.
///
/// Spec code uses this to assert on expected errors from inside an action:
///
/// ```rust
/// use specrun::catch::{catch, Caught};
///
/// let caught = catch(|| "x".parse::<i32>());
/// assert!(matches!(caught, Caught::Raised(_)));
///
/// let caught = catch(|| "7".parse::<i32>());
/// assert!(caught.is_nothing());
/// ```
pub fn catch<T, E>(f: impl FnOnce() -> Result<T, E>) -> Caught<E> {
    match invoke(|| Ok(f())) {
        Ok(Ok(_)) => Caught::Nothing,
        Ok(Err(err)) => Caught::Raised(err),
        Err(panicked) => Caught::Panicked(panicked),
    }
}

/// [`catch`] with explicit arguments.
pub fn catch_with<A, T, E>(f: impl FnOnce(A) -> Result<T, E>, args: A) -> Caught<E> {
    catch(move || f(args))
}

/// Run a closure that can only fail by panicking.
pub fn catch_panic<T>(f: impl FnOnce() -> T) -> Caught<Infallible> {
    catch(|| Ok::<T, Infallible>(f()))
}
