//! # Tasker Example Firmware
//!
//! Three event-driven tasks on one stack:
//!
//! | Task | Priority | Woken by | Behavior |
//! |------|----------|----------|----------|
//! | `control` | 0 | SysTick, every tick | Short control-loop step |
//! | `housekeeping` | 1 | SysTick, once per second | Aggregates counters, wakes `report` |
//! | `report` | 2 | `housekeeping` | Publishes a snapshot |
//!
//! SysTick posts from interrupt context inside `TASKER.isr(..)`, so the
//! tasks run from PendSV once the ISR has returned. `control` preempts
//! `housekeeping` and `report` whenever a tick arrives while they run.
//!
//! A dispatch pass only climbs in urgency, so a task left behind a more
//! urgent one waits for the next pass. The idle hook requests another
//! PendSV while anything is still pending and sleeps otherwise.

#![no_std]
#![no_main]

use core::ops::ControlFlow;
use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m_rt::{entry, exception};
use panic_halt as _;

use tasker::arch::cortex_m4::{self, CortexM};
use tasker::config::TICK_HZ;
use tasker::{EventMask, Port, Task, Tasker};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

const EV_TICK: EventMask = EventMask::bit(0);
const EV_SECOND: EventMask = EventMask::bit(1);
const EV_PUBLISH: EventMask = EventMask::bit(0);
const EV_RESET: EventMask = EventMask::bit(1);

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

static TICKS: AtomicU32 = AtomicU32::new(0);
static CONTROL_STEPS: AtomicU32 = AtomicU32::new(0);
static STEPS_LAST_SECOND: AtomicU32 = AtomicU32::new(0);
static PUBLISHED: AtomicU32 = AtomicU32::new(0);

static CONTROL: Task = Task::new("control", control_task);
static HOUSEKEEPING: Task = Task::new("housekeeping", housekeeping_task);
static REPORT: Task = Task::new("report", report_task);

static TASKER: Tasker<'static, CortexM, 3> =
    Tasker::new([&CONTROL, &HOUSEKEEPING, &REPORT], CortexM::new());

tasker::pendsv_handler!(TASKER);

/// **Control** (priority 0): one step per tick. Several ticks that arrive
/// before it runs coalesce into one step.
fn control_task(events: EventMask) {
    if events.contains(EV_TICK) {
        let steps = CONTROL_STEPS.load(Ordering::Relaxed);
        CONTROL_STEPS.store(steps.wrapping_add(1), Ordering::Relaxed);
    }
}

/// **Housekeeping** (priority 1): latches the step counter and asks
/// `report` to publish. Both posts go out together when the lock drops.
fn housekeeping_task(events: EventMask) {
    if !events.contains(EV_SECOND) {
        return;
    }

    let _lock = TASKER.lock();
    let steps = CONTROL_STEPS.load(Ordering::Relaxed);
    STEPS_LAST_SECOND.store(steps, Ordering::Relaxed);
    TASKER.post_event(&REPORT, EV_PUBLISH);
    if steps > TICK_HZ * 60 {
        TASKER.post_event(&REPORT, EV_RESET);
    }
}

/// **Report** (priority 2): background publishing.
fn report_task(events: EventMask) {
    if events.contains(EV_PUBLISH) {
        let count = PUBLISHED.load(Ordering::Relaxed);
        PUBLISHED.store(count.wrapping_add(1), Ordering::Relaxed);
    }
    if events.contains(EV_RESET) {
        CONTROL_STEPS.store(0, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Interrupts
// ---------------------------------------------------------------------------

#[exception]
fn SysTick() {
    TASKER.isr(|| {
        let ticks = TICKS.load(Ordering::Relaxed).wrapping_add(1);
        TICKS.store(ticks, Ordering::Relaxed);

        TASKER.post_event(&CONTROL, EV_TICK);
        if ticks % TICK_HZ == 0 {
            TASKER.post_event(&HOUSEKEEPING, EV_SECOND);
        }
    });
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Firmware entry point. Configures PendSV and SysTick, then hands the
/// core to the tasker. Does not return.
#[entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();

    cortex_m4::set_pendsv_priority(&mut cp.SCB);
    cortex_m4::configure_systick(&mut cp.SYST, TICK_HZ);

    TASKER.start(|| {
        if TASKER.has_pending() {
            TASKER.port().set_pending();
        } else {
            TASKER.port().wait_for_interrupt();
        }
        ControlFlow::Continue(())
    });
    unreachable!()
}
