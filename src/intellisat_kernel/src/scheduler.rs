//! The tick ISR body (spec.md §4.4, "Scheduler").
//!
//! spec.md's source aborts the running task with a captured-continuation
//! long-jump. This crate takes the redesign spec.md §9 recommends instead:
//! a cancellation flag set here and polled by `run()` bodies at bounded
//! intervals (see [`intellisat_core::CancellationToken`]). `scheduler()`
//! itself never touches the task's stack; it only decides *whether* to ask
//! for an abort.

use core::sync::atomic::{AtomicBool, Ordering};

use intellisat_core::{CurrentTask, ModeBitsSetter, TaskTable};

use crate::arbiter::systems_check;

/// The cancellation flag shared between the tick thread (writer) and the
/// running mode body (reader, via [`intellisat_core::CancellationToken`]).
///
/// Deliberately a single `AtomicBool`: spec.md §5 requires that "any
/// bit-set operation interrupted by the ISR must have completed before the
/// jump, or must not yet have started" — a single atomic word trivially
/// satisfies that, there being nothing to interleave.
#[derive(Debug, Default)]
pub struct PreemptionSignal(AtomicBool);

impl PreemptionSignal {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Raised by the scheduler; observed by the running mode's `run()`.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Cleared by the dispatcher once it has reacted to a raised signal and
    /// is about to invoke the next mode's `run()`.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl intellisat_core::CancellationToken for PreemptionSignal {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Invoked by the tick source on every timer tick (spec.md §4.4).
///
/// Runs the arbiter, compares its pick to `currTask`, and if they differ,
/// raises `preemption` — the cooperative equivalent of the non-local jump
/// to the mode-select reentry point. If they match, this returns having
/// changed nothing observable; the preempted-in-spirit-only task keeps
/// running.
pub fn scheduler(
    table: &TaskTable,
    mode_bits: ModeBitsSetter<'_>,
    current_task: &CurrentTask,
    preemption: &PreemptionSignal,
) {
    let selected = systems_check(table, mode_bits);
    let running = current_task.get();

    if selected != running {
        log::debug!("scheduler: tick preempts {running} in favor of {selected}");
        preemption.raise();
    } else {
        log::trace!("scheduler: tick confirms {running} continues running");
    }
}
