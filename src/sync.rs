//! # Synchronization Primitives
//!
//! Interrupt-safe critical section built on a [`Port`]. All shared
//! scheduler state that is read-modify-written (task event masks, the
//! dispatch pass itself) is accessed inside one.

use crate::port::Port;

/// Scoped critical section: interrupts are disabled on construction and
/// the previous enable state is restored on drop, so sections nest.
#[must_use = "the critical section ends when the guard is dropped"]
pub struct CriticalSection<'p, P: Port> {
    port: &'p P,
    was_enabled: bool,
}

impl<'p, P: Port> CriticalSection<'p, P> {
    #[inline]
    pub fn enter(port: &'p P) -> Self {
        let was_enabled = port.acquire();
        Self { port, was_enabled }
    }
}

impl<P: Port> Drop for CriticalSection<'_, P> {
    #[inline]
    fn drop(&mut self) {
        self.port.release(self.was_enabled);
    }
}

/// Execute a closure within a critical section.
///
/// # Usage
/// ```ignore
/// sync::free(&port, |_cs| {
///     // Access shared state safely
/// });
/// ```
#[inline]
pub fn free<P, F, R>(port: &P, f: F) -> R
where
    P: Port,
    F: FnOnce(&CriticalSection<'_, P>) -> R,
{
    let cs = CriticalSection::enter(port);
    f(&cs)
}
