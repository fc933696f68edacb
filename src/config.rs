//! # Tasker Configuration
//!
//! Compile-time constants governing the scheduler and the demo firmware.
//! The task set itself is fixed at compile time through the `N` parameter
//! of [`Tasker`](crate::scheduler::Tasker); nothing here is allocated.

/// Largest value the scheduler lock counter may hold. One more
/// `isr_entry()` / `lock()` at this depth is a fatal assertion.
pub const LOCK_DEPTH_MAX: u8 = u8::MAX;

/// Lock depth a freshly constructed tasker starts with. Non-zero so that
/// events posted before `start()` are only recorded, never dispatched.
pub const INITIAL_LOCK_DEPTH: u8 = 1;

/// Priority written to the PendSV system handler. The deferred dispatch
/// must run below every application interrupt, so this is the lowest
/// priority the NVIC can encode (the low bits are ignored on parts that
/// implement fewer than 8 priority bits).
pub const PENDSV_PRIORITY: u8 = 0xFF;

/// System clock frequency in Hz (default for STM32F4 at 16 MHz HSI).
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// SysTick frequency used by the demo firmware to generate events.
pub const TICK_HZ: u32 = 1000;

/// SysTick reload value producing `hz` interrupts per second from
/// [`SYSTEM_CLOCK_HZ`].
///
/// # Panics
///
/// If `hz` is zero or faster than the core clock.
pub const fn systick_reload(hz: u32) -> u32 {
    assert!(hz != 0 && hz <= SYSTEM_CLOCK_HZ, "SysTick rate out of range");
    SYSTEM_CLOCK_HZ / hz - 1
}
