//! # Port Layer
//!
//! The two hardware capabilities the scheduler depends on, plus the idle
//! hook that runs when no task is pending:
//!
//! - **Interrupt masking**: a nestable critical section that restores the
//!   previous global enable state, and raw enable/disable used around task
//!   handlers.
//! - **Reschedule trigger**: marks the lowest-priority deferred-dispatch
//!   exception (PendSV on Cortex-M) as pending.
//!
//! The scheduler never calls platform intrinsics directly; the Cortex-M
//! implementation lives in [`arch::cortex_m4`](crate::arch).

use core::ops::ControlFlow;

/// Hardware capabilities required by [`Tasker`](crate::scheduler::Tasker).
///
/// Implementations must be `Sync`: the tasker is shared between thread
/// mode and interrupt handlers.
pub trait Port: Sync {
    /// Disable interrupts and report whether they were enabled before.
    fn acquire(&self) -> bool;

    /// Undo one [`acquire`](Port::acquire). Interrupts are re-enabled only
    /// if `was_enabled` is true.
    fn release(&self, was_enabled: bool);

    /// Unconditionally enable interrupts.
    fn enable_interrupts(&self);

    /// Unconditionally disable interrupts.
    fn disable_interrupts(&self);

    /// Request the deferred dispatch. Idempotent: the pending bit is sticky
    /// until the exception is taken.
    fn set_pending(&self);

    /// Sleep until the next interrupt.
    fn wait_for_interrupt(&self);
}

/// Background activity run by `start()` whenever no task is pending.
///
/// Returning [`ControlFlow::Break`] makes `start()` return; a production
/// hook never does.
pub trait Idle {
    fn idle(&mut self) -> ControlFlow<()>;
}

impl<F> Idle for F
where
    F: FnMut() -> ControlFlow<()>,
{
    fn idle(&mut self) -> ControlFlow<()> {
        self()
    }
}

/// Idle hook that sleeps the core between interrupts.
pub struct WaitForInterrupt<'p, P: Port> {
    port: &'p P,
}

impl<'p, P: Port> WaitForInterrupt<'p, P> {
    pub const fn new(port: &'p P) -> Self {
        Self { port }
    }
}

impl<P: Port> Idle for WaitForInterrupt<'_, P> {
    fn idle(&mut self) -> ControlFlow<()> {
        self.port.wait_for_interrupt();
        ControlFlow::Continue(())
    }
}
