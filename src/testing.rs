//! Host-side test doubles: a [`Port`] that records what the scheduler asks
//! of the hardware, and a trace buffer for handler ordering.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::vec::Vec;

use crate::port::Port;
use crate::scheduler::Tasker;

pub(crate) struct MockPort {
    enabled: AtomicBool,
    cs_depth: AtomicUsize,
    pending: AtomicUsize,
    wfi: AtomicUsize,
}

impl MockPort {
    pub(crate) const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            cs_depth: AtomicUsize::new(0),
            pending: AtomicUsize::new(0),
            wfi: AtomicUsize::new(0),
        }
    }

    pub(crate) fn interrupts_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub(crate) fn cs_depth(&self) -> usize {
        self.cs_depth.load(Ordering::SeqCst)
    }

    /// Number of `set_pending()` calls not yet consumed by [`take_pending`](Self::take_pending).
    pub(crate) fn pending_requests(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Consume the sticky pending bit, as taking the exception would.
    pub(crate) fn take_pending(&self) -> bool {
        self.pending.swap(0, Ordering::SeqCst) != 0
    }

    pub(crate) fn wfi_count(&self) -> usize {
        self.wfi.load(Ordering::SeqCst)
    }
}

impl Port for MockPort {
    fn acquire(&self) -> bool {
        self.cs_depth.fetch_add(1, Ordering::SeqCst);
        self.enabled.swap(false, Ordering::SeqCst)
    }

    fn release(&self, was_enabled: bool) {
        self.cs_depth.fetch_sub(1, Ordering::SeqCst);
        if was_enabled {
            self.enabled.store(true, Ordering::SeqCst);
        }
    }

    fn enable_interrupts(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    fn disable_interrupts(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    fn set_pending(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    fn wait_for_interrupt(&self) {
        self.wfi.fetch_add(1, Ordering::SeqCst);
    }
}

/// Simulate an interrupt arriving in thread mode: `isr` runs inside
/// `isr_entry`/`isr_exit`, then the deferred dispatch is taken if it was
/// requested, the way PendSV tail-chains on exception return.
pub(crate) fn raise_interrupt<const N: usize>(tasker: &Tasker<'_, MockPort, N>, isr: impl FnOnce()) {
    assert!(
        tasker.port().interrupts_enabled(),
        "interrupt raised while masked"
    );
    tasker.isr(isr);
    if tasker.port().take_pending() {
        tasker.on_pending();
    }
}

/// Ordered record of handler activity.
pub(crate) struct Trace(Mutex<Vec<&'static str>>);

impl Trace {
    pub(crate) const fn new() -> Self {
        Trace(Mutex::new(Vec::new()))
    }

    pub(crate) fn push(&self, entry: &'static str) {
        self.0.lock().unwrap().push(entry);
    }

    pub(crate) fn take(&self) -> Vec<&'static str> {
        core::mem::take(&mut *self.0.lock().unwrap())
    }
}
