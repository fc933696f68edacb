//! # Scheduler Lock Counter
//!
//! Nesting depth of regions in which dispatch is suppressed: open ISRs
//! (`isr_entry`/`isr_exit`) and thread-mode scheduler locks. Dispatch may
//! only start while the depth is zero.
//!
//! Only plain loads and stores are used. An interrupt that preempts an
//! update always leaves the counter as it found it before returning, so
//! the load/store pair cannot lose an increment.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::config::LOCK_DEPTH_MAX;
use crate::error::LockError;

pub struct LockCounter {
    depth: AtomicU8,
}

impl LockCounter {
    pub const fn new(initial: u8) -> Self {
        Self {
            depth: AtomicU8::new(initial),
        }
    }

    /// Current nesting depth.
    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.depth() != 0
    }

    /// Open one more locked region. Returns the new depth.
    pub fn enter(&self) -> Result<u8, LockError> {
        let depth = self.depth();
        if depth == LOCK_DEPTH_MAX {
            return Err(LockError::Saturated);
        }
        self.depth.store(depth + 1, Ordering::Release);
        Ok(depth + 1)
    }

    /// Close the innermost locked region. Returns the new depth.
    pub fn exit(&self) -> Result<u8, LockError> {
        let depth = self.depth();
        if depth == 0 {
            return Err(LockError::Unbalanced);
        }
        self.depth.store(depth - 1, Ordering::Release);
        Ok(depth - 1)
    }

    /// Force the depth to zero. Only `start()` does this, once, under a
    /// critical section.
    pub(crate) fn reset(&self) {
        self.depth.store(0, Ordering::Release);
    }
}
