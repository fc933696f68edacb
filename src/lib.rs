//! # Tasker — strict-priority, run-to-completion event dispatcher
//!
//! A cooperative scheduler for ARM Cortex-M microcontrollers. Tasks are
//! plain handler functions woken by event flags; the scheduler calls the
//! most urgent pending one and lets it run to completion. There are no
//! per-task stacks and no blocking: preemption happens by nesting the
//! dispatch pass, either from a handler that posts to a more urgent task or
//! from the lowest-priority PendSV exception after an ISR has posted.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │            Application Tasks (static Task values)       │
//! ├────────────────────────────────────────────────────────┤
//! │                Tasker (scheduler.rs)                    │
//! │   start() · post_event() · isr_entry() · isr_exit()     │
//! │   lock() · on_pending()                                 │
//! ├──────────────┬──────────────────┬──────────────────────┤
//! │  Task/Events │   Lock counter   │   Critical section   │
//! │  task.rs     │   lock.rs        │   sync.rs            │
//! ├──────────────┴──────────────────┴──────────────────────┤
//! │                 Port trait (port.rs)                    │
//! │   acquire/release · set_pending · wait_for_interrupt    │
//! ├────────────────────────────────────────────────────────┤
//! │            Arch Port (arch/cortex_m4.rs)                │
//! │          PRIMASK · PendSV · WFI · SysTick               │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Priorities
//!
//! A task's priority is its index in the array handed to
//! [`Tasker::new`]; index 0 is the most urgent. Priorities never change.
//!
//! ## Memory Model
//!
//! - **No heap**: the tasker and every task are `static`
//! - **Single stack**: handlers are direct calls
//! - **Critical sections**: through the [`Port`] capability, never raw
//!   intrinsics

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod arch;
pub mod config;
pub mod error;
mod lock;
pub mod port;
pub mod scheduler;
pub mod sync;
pub mod task;

#[cfg(test)]
mod testing;

pub use error::LockError;
pub use port::{Idle, Port, WaitForInterrupt};
pub use scheduler::{SchedulerLock, Status, Tasker};
pub use task::{EventMask, Handler, Task};
