//! # Scheduler
//!
//! Strict fixed-priority, run-to-completion event dispatcher. There is a
//! single stack: "running a task" is a direct call to its handler, and
//! preemption is a nested call of the same dispatch pass from a handler or
//! from the deferred-dispatch exception.
//!
//! ## Dispatch Pass
//!
//! Always entered with a critical section held:
//! 1. Record the active priority on entry (the preempted level)
//! 2. Find the highest-priority (lowest index) task with pending events
//! 3. While that task is more urgent than the active one:
//!    a. mark it active, clear its events and call its handler with the
//!       cleared events and interrupts enabled
//!    b. look again, since the handler or an ISR may have posted more
//! 4. Restore the active priority to the preempted level
//!
//! The active priority only ever rises in urgency during a pass. A task
//! left pending behind the one just run is picked up by the next pass
//! (the next post, scheduler unlock or deferred dispatch).
//!
//! ## Locking
//!
//! Dispatch only starts while the lock counter is zero. ISRs bracket their
//! work with [`Tasker::isr_entry`] / [`Tasker::isr_exit`]; the exit requests
//! the deferred dispatch through [`Port::set_pending`] instead of running
//! tasks on the ISR's stack frame. Thread-mode code can hold a
//! [`SchedulerLock`] to batch posts; releasing the last one dispatches
//! directly.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::config::INITIAL_LOCK_DEPTH;
use crate::error::fatal;
use crate::lock::LockCounter;
use crate::port::{Idle, Port};
use crate::sync::{self, CriticalSection};
use crate::task::{EventMask, Task};

/// Lifecycle of a tasker. `Running` is entered once and never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    NotRunning,
    Running,
}

// ---------------------------------------------------------------------------
// Tasker
// ---------------------------------------------------------------------------

/// The dispatcher over `N` tasks. Priority is the index in `tasks`
/// (0 = most urgent); the index `N` stands for "no task running".
///
/// Meant to live in a `static` shared by thread mode and interrupt
/// handlers:
///
/// ```ignore
/// static TASKER: Tasker<'static, CortexM, 2> =
///     Tasker::new([&RADIO, &HOUSEKEEPING], CortexM::new());
/// ```
pub struct Tasker<'a, P: Port, const N: usize> {
    tasks: [&'a Task; N],
    port: P,
    running: AtomicBool,
    /// Priority of the task currently executing, or `N` when idle.
    active: AtomicUsize,
    lock: LockCounter,
}

impl<'a, P: Port, const N: usize> Tasker<'a, P, N> {
    pub const fn new(tasks: [&'a Task; N], port: P) -> Self {
        Self {
            tasks,
            port,
            running: AtomicBool::new(false),
            active: AtomicUsize::new(N),
            lock: LockCounter::new(INITIAL_LOCK_DEPTH),
        }
    }

    /// Start scheduling and run the idle hook.
    ///
    /// The first call unlocks the scheduler, runs a dispatch pass over the
    /// events posted so far and then calls `idle` until it breaks. With a hook that never
    /// breaks (e.g. [`WaitForInterrupt`](crate::port::WaitForInterrupt))
    /// this never returns. Later calls return immediately.
    pub fn start<I: Idle>(&self, mut idle: I) {
        if self.status() == Status::Running {
            return;
        }
        self.running.store(true, Ordering::Release);
        info!("tasker: start, {} tasks", N);

        {
            let _cs = CriticalSection::enter(&self.port);
            self.lock.reset();
            self.schedule();
        }

        while idle.idle().is_continue() {}
    }

    /// Merge `events` into `task` and dispatch if the scheduler is unlocked.
    ///
    /// Safe to call from task handlers and from ISRs that have called
    /// [`isr_entry`](Self::isr_entry).
    pub fn post_event(&self, task: &Task, events: EventMask) {
        debug_assert!(
            self.priority_of(task).is_some(),
            "task is not managed by this tasker"
        );

        let _cs = CriticalSection::enter(&self.port);
        task.post(events);
        if !self.lock.is_locked() {
            self.schedule();
        }
    }

    /// [`post_event`](Self::post_event) addressed by priority index.
    ///
    /// # Panics
    /// If there is no task at `priority`.
    pub fn post_event_to(&self, priority: usize, events: EventMask) {
        match self.tasks.get(priority) {
            Some(task) => self.post_event(task, events),
            None => {
                error!("tasker: no task at priority {}", priority);
                panic!("no task at priority {}", priority)
            }
        }
    }

    /// Called first thing in every ISR that may post events.
    #[inline]
    pub fn isr_entry(&self) {
        if let Err(err) = self.lock.enter() {
            fatal(err);
        }
    }

    /// Called last thing in every ISR that called [`isr_entry`](Self::isr_entry).
    /// Always requests the deferred dispatch; it is a no-op if nothing is
    /// pending by the time it runs.
    #[inline]
    pub fn isr_exit(&self) {
        if let Err(err) = self.lock.exit() {
            fatal(err);
        }
        self.port.set_pending();
    }

    /// Run `f` between [`isr_entry`](Self::isr_entry) and
    /// [`isr_exit`](Self::isr_exit).
    #[inline]
    pub fn isr<R>(&self, f: impl FnOnce() -> R) -> R {
        self.isr_entry();
        let result = f();
        self.isr_exit();
        result
    }

    /// Suppress dispatch until the returned guard is dropped. Guards nest.
    pub fn lock(&self) -> SchedulerLock<'_, 'a, P, N> {
        self.disable_scheduler();
        SchedulerLock { tasker: self }
    }

    /// Deferred dispatch entry point, bound to the lowest-priority
    /// exception (PendSV). Does nothing while the scheduler is locked: the
    /// holder of the lock dispatches when it lets go.
    pub fn on_pending(&self) {
        sync::free(&self.port, |_cs| {
            if self.lock.is_locked() {
                trace!("tasker: deferred dispatch skipped, lock depth {}", self.lock.depth());
                return;
            }
            self.schedule();
        })
    }

    /// True if any task has events waiting for a dispatch pass.
    pub fn has_pending(&self) -> bool {
        self.first_pending() < N
    }

    pub fn status(&self) -> Status {
        if self.running.load(Ordering::Acquire) {
            Status::Running
        } else {
            Status::NotRunning
        }
    }

    /// Priority of the task whose handler is executing, `None` at idle.
    pub fn active_task(&self) -> Option<usize> {
        let active = self.active.load(Ordering::Acquire);
        (active < N).then_some(active)
    }

    pub fn lock_depth(&self) -> u8 {
        self.lock.depth()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub const fn task_count(&self) -> usize {
        N
    }

    pub fn task(&self, priority: usize) -> Option<&'a Task> {
        self.tasks.get(priority).copied()
    }

    pub fn priority_of(&self, task: &Task) -> Option<usize> {
        self.tasks.iter().position(|t| core::ptr::eq(*t, task))
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub(crate) fn disable_scheduler(&self) {
        if let Err(err) = self.lock.enter() {
            fatal(err);
        }
    }

    pub(crate) fn enable_scheduler(&self) {
        match self.lock.exit() {
            Ok(0) => {
                let _cs = CriticalSection::enter(&self.port);
                self.schedule();
            }
            Ok(_) => {}
            Err(err) => fatal(err),
        }
    }

    /// One dispatch pass. Caller holds a critical section.
    fn schedule(&self) {
        let preempted = self.active.load(Ordering::Relaxed);
        let mut next = self.first_pending();

        while next < self.active.load(Ordering::Relaxed) {
            self.active.store(next, Ordering::Relaxed);
            self.call_task(next);
            next = self.first_pending();
        }

        self.active.store(preempted, Ordering::Relaxed);
    }

    /// Index of the most urgent task with pending events, or `N`.
    fn first_pending(&self) -> usize {
        self.tasks
            .iter()
            .position(|task| task.is_pending())
            .unwrap_or(N)
    }

    fn call_task(&self, id: usize) {
        let task = self.tasks[id];
        let events = task.take();
        trace!("tasker: run {} ({}) {}", id, task.name(), events);

        // The handler runs with interrupts on so ISRs, and through them
        // more urgent tasks, can preempt it.
        self.port.enable_interrupts();
        task.run(events);
        self.port.disable_interrupts();
    }
}

// ---------------------------------------------------------------------------
// Scheduler lock guard
// ---------------------------------------------------------------------------

/// Thread-mode scheduling lock returned by [`Tasker::lock`]. Events posted
/// while it is held are recorded but not dispatched; dropping the
/// outermost guard dispatches them.
#[must_use = "the scheduler is unlocked again when the guard is dropped"]
pub struct SchedulerLock<'t, 'a, P: Port, const N: usize> {
    tasker: &'t Tasker<'a, P, N>,
}

impl<P: Port, const N: usize> Drop for SchedulerLock<'_, '_, P, N> {
    fn drop(&mut self) {
        self.tasker.enable_scheduler();
    }
}
