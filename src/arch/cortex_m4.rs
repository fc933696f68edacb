//! # Cortex-M Port Layer
//!
//! [`Port`] implementation for ARM Cortex-M (ARMv6-M and ARMv7-M).
//!
//! ## Interrupt masking
//!
//! The critical section is PRIMASK based: entering reads PRIMASK and sets
//! it, leaving clears it only if interrupts were enabled before. Sections
//! therefore nest, and a section entered from an ISR that already runs
//! masked leaves them masked.
//!
//! ## Deferred dispatch
//!
//! `isr_exit()` sets PENDSVSET in the ICSR. PendSV runs at
//! [`PENDSV_PRIORITY`], the lowest priority, so it is only taken once every
//! application ISR has returned; its handler calls
//! [`Tasker::on_pending`](crate::scheduler::Tasker::on_pending). Bind it
//! with [`pendsv_handler!`](crate::pendsv_handler).

use cortex_m::interrupt;
use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{SCB, SYST};
use cortex_m::register::primask;

use crate::config::{systick_reload, PENDSV_PRIORITY};
use crate::port::Port;

/// Single-core Cortex-M port.
pub struct CortexM {
    _private: (),
}

impl CortexM {
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl Port for CortexM {
    #[inline]
    fn acquire(&self) -> bool {
        let was_enabled = primask::read().is_active();
        interrupt::disable();
        was_enabled
    }

    #[inline]
    fn release(&self, was_enabled: bool) {
        if was_enabled {
            // SAFETY: interrupts were enabled when the matching acquire ran
            unsafe { interrupt::enable() }
        }
    }

    #[inline]
    fn enable_interrupts(&self) {
        // SAFETY: only called by the dispatcher around a task handler; all
        // scheduler state is consistent at that point.
        unsafe { interrupt::enable() }
    }

    #[inline]
    fn disable_interrupts(&self) {
        interrupt::disable();
    }

    #[inline]
    fn set_pending(&self) {
        SCB::set_pendsv();
    }

    #[inline]
    fn wait_for_interrupt(&self) {
        cortex_m::asm::wfi();
    }
}

/// Set PendSV to the lowest interrupt priority.
///
/// Must run before `start()`: with a higher PendSV priority the deferred
/// dispatch could preempt application ISRs.
pub fn set_pendsv_priority(scb: &mut SCB) {
    // SAFETY: changing the PendSV priority cannot break a priority-based
    // critical section; the scheduler only masks through PRIMASK.
    unsafe {
        scb.set_priority(SystemHandler::PendSV, PENDSV_PRIORITY);
    }
}

/// Configure SysTick to fire at `hz` from the core clock.
///
/// # Panics
///
/// If `hz` is zero or above [`SYSTEM_CLOCK_HZ`](crate::config::SYSTEM_CLOCK_HZ).
pub fn configure_systick(syst: &mut SYST, hz: u32) {
    syst.set_reload(systick_reload(hz));
    syst.clear_current();
    syst.set_clock_source(SystClkSource::Core);
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Define the `PendSV` exception handler for a `static` tasker.
///
/// ```ignore
/// static TASKER: Tasker<'static, CortexM, 3> = Tasker::new(TASKS, CortexM::new());
/// tasker::pendsv_handler!(TASKER);
/// ```
///
/// The calling crate must depend on `cortex-m-rt`.
#[macro_export]
macro_rules! pendsv_handler {
    ($tasker:path) => {
        #[::cortex_m_rt::exception]
        fn PendSV() {
            $tasker.on_pending();
        }
    };
}
