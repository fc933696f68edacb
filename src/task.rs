//! # Tasks and Events
//!
//! A [`Task`] is a handler plus a word of pending event flags. Tasks are
//! defined statically by the application and handed to the scheduler as an
//! ordered array; a task's priority is its position in that array.
//!
//! ```text
//!          post_event(mask)            dispatch (clear + call)
//!   ┌──────┐  events |= mask  ┌─────────┐  events = NONE  ┌─────────┐
//!   │ Idle │ ───────────────► │ Pending │ ──────────────► │ Running │
//!   └──────┘                  └─────────┘                 └─────────┘
//!       ▲                        ▲   │ more posts coalesce     │
//!       │                        └───┘                         │
//!       └──────────────────────── handler returns ─────────────┘
//! ```
//!
//! A task that receives new events while its handler runs goes straight
//! back to Pending and is dispatched again by the next pass.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};
use core::sync::atomic::{AtomicU32, Ordering};

// ---------------------------------------------------------------------------
// Event mask
// ---------------------------------------------------------------------------

/// Set of event flags. Each bit is one reason for a task to run; posting
/// the same bit several times before dispatch is observed once.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventMask(u32);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        EventMask(bits)
    }

    /// Mask with only bit `n` set.
    ///
    /// # Panics
    /// If `n` is 32 or larger.
    #[inline]
    pub const fn bit(n: u32) -> Self {
        assert!(n < u32::BITS, "event bit out of range");
        EventMask(1 << n)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is also set in `self`.
    #[inline]
    pub const fn contains(self, other: EventMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: EventMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for EventMask {
    type Output = EventMask;

    fn bitand(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 & rhs.0)
    }
}

impl fmt::Debug for EventMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventMask({:#b})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// Handler invoked by the scheduler with the events that were pending at
/// the moment the task was dispatched.
pub type Handler = fn(EventMask);

pub struct Task {
    name: &'static str,
    events: AtomicU32,
    handler: Handler,
}

impl Task {
    pub const fn new(name: &'static str, handler: Handler) -> Self {
        Self {
            name,
            events: AtomicU32::new(0),
            handler,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Events posted since the last dispatch.
    #[inline]
    pub fn pending(&self) -> EventMask {
        EventMask(self.events.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        !self.pending().is_empty()
    }

    /// Merge `events` into the pending set.
    ///
    /// Load and store are separate so this works on cores without atomic
    /// read-modify-write; callers hold a critical section.
    #[inline]
    pub(crate) fn post(&self, events: EventMask) {
        let merged = self.events.load(Ordering::Relaxed) | events.0;
        self.events.store(merged, Ordering::Release);
    }

    /// Clear the pending set and return what it held. Called under a
    /// critical section, immediately before [`run`](Task::run).
    #[inline]
    pub(crate) fn take(&self) -> EventMask {
        let events = self.events.load(Ordering::Acquire);
        self.events.store(0, Ordering::Relaxed);
        EventMask(events)
    }

    #[inline]
    pub(crate) fn run(&self, events: EventMask) {
        (self.handler)(events)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("events", &self.pending())
            .finish()
    }
}
