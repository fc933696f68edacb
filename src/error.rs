//! # Errors
//!
//! Every failure the scheduler can detect is a programming error in the
//! firmware (mismatched ISR entry/exit, runaway nesting). They are reported
//! once through [`fatal`] and never recovered from.

use core::fmt;

/// Violations of the scheduler lock discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockError {
    /// The lock counter is already at [`LOCK_DEPTH_MAX`](crate::config::LOCK_DEPTH_MAX).
    Saturated,
    /// A release or `isr_exit()` without a matching acquire or `isr_entry()`.
    Unbalanced,
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::Saturated => f.write_str("scheduler lock counter saturated"),
            LockError::Unbalanced => f.write_str("scheduler lock released without matching acquire"),
        }
    }
}

/// Fatal assertion. On target the panic handler (`panic-halt`) stops the
/// core; under test the panic is observable with `#[should_panic]`.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: LockError) -> ! {
    error!("tasker: {}", err);
    panic!("{}", err)
}
