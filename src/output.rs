//! Capturable output streams for spec code.
//!
//! Spec code writes through [`spec_print!`](crate::spec_print), [`spec_println!`](crate::spec_println) and the
//! `spec_eprint*` variants. Uncaptured, these go to the real process streams. While an [`OutputCapture`] guard is
//! alive they are buffered instead, so a reporter can attach the text to a failing assertion.
//!
//! Only these macros are captured. Std `println!` and friends always write to the process streams.
//!
//! Capture is per thread. Specs run on the thread that runs the suite, so one capture covers a whole context.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;

use thiserror::Error;

/// One of the two capturable streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Stdout,
    Stderr,
}

impl Channel {
    fn slot(self) -> usize {
        match self {
            Channel::Stdout => 0,
            Channel::Stderr => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Stdout => "stdout",
            Channel::Stderr => "stderr",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("{0} is already being captured on this thread")]
    AlreadyActive(Channel),
}

thread_local! {
    static CAPTURES: RefCell<[Option<String>; 2]> = const { RefCell::new([None, None]) };
}

/// Guard for an active capture. Dropping it restores the real stream.
#[derive(Debug)]
pub struct OutputCapture {
    channel: Channel,
    // Capture state is thread-local, so the guard must stay on its thread.
    _not_send: PhantomData<*const ()>,
}

impl OutputCapture {
    /// Start capturing `channel` on the current thread.
    ///
    /// ## Errors
    /// - [`CaptureError::AlreadyActive`] if `channel` is already captured.
    pub fn acquire(channel: Channel) -> Result<Self, CaptureError> {
        CAPTURES.with(|captures| {
            let mut captures = captures.borrow_mut();
            let slot = &mut captures[channel.slot()];
            if slot.is_some() {
                return Err(CaptureError::AlreadyActive(channel));
            }
            *slot = Some(String::new());
            Ok(OutputCapture {
                channel,
                _not_send: PhantomData,
            })
        })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Everything captured so far.
    pub fn contents(&self) -> String {
        CAPTURES.with(|captures| captures.borrow()[self.channel.slot()].clone().unwrap_or_default())
    }

    /// Everything captured so far, emptying the buffer.
    pub fn take(&self) -> String {
        CAPTURES.with(|captures| {
            captures.borrow_mut()[self.channel.slot()]
                .as_mut()
                .map(std::mem::take)
                .unwrap_or_default()
        })
    }

    /// Stop capturing and return what was captured.
    pub fn finish(self) -> String {
        self.take()
    }
}

impl Drop for OutputCapture {
    fn drop(&mut self) {
        CAPTURES.with(|captures| captures.borrow_mut()[self.channel.slot()] = None);
    }
}

/// Whether `channel` is currently captured on this thread.
pub fn is_captured(channel: Channel) -> bool {
    CAPTURES.with(|captures| captures.borrow()[channel.slot()].is_some())
}

#[doc(hidden)]
pub fn write_fmt(channel: Channel, args: fmt::Arguments<'_>) {
    let buffered = CAPTURES.with(|captures| {
        let mut captures = captures.borrow_mut();
        match captures[channel.slot()].as_mut() {
            Some(buffer) => {
                fmt::Write::write_fmt(buffer, args).is_ok()
            }
            None => false,
        }
    });
    if !buffered {
        match channel {
            Channel::Stdout => print!("{args}"),
            Channel::Stderr => eprint!("{args}"),
        }
    }
}

/// Print to the spec's standard output.
#[macro_export]
macro_rules! spec_print {
    ($($arg:tt)*) => {
        $crate::output::write_fmt($crate::output::Channel::Stdout, format_args!($($arg)*))
    };
}

/// Print a line to the spec's standard output.
#[macro_export]
macro_rules! spec_println {
    () => {
        $crate::output::write_fmt($crate::output::Channel::Stdout, format_args!("\n"))
    };
    ($($arg:tt)*) => {
        $crate::output::write_fmt($crate::output::Channel::Stdout, format_args!("{}\n", format_args!($($arg)*)))
    };
}

/// Print to the spec's standard error.
#[macro_export]
macro_rules! spec_eprint {
    ($($arg:tt)*) => {
        $crate::output::write_fmt($crate::output::Channel::Stderr, format_args!($($arg)*))
    };
}

/// Print a line to the spec's standard error.
#[macro_export]
macro_rules! spec_eprintln {
    () => {
        $crate::output::write_fmt($crate::output::Channel::Stderr, format_args!("\n"))
    };
    ($($arg:tt)*) => {
        $crate::output::write_fmt($crate::output::Channel::Stderr, format_args!("{}\n", format_args!($($arg)*)))
    };
}
