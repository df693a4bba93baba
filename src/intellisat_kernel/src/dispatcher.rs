//! The superloop (spec.md §4.5, "ModeDispatcher") and the `Executive` value
//! that collects the executive's process-wide state, per the "Global state"
//! design note in spec.md §9 ("collect them into a single Executive value
//! constructed at startup and threaded through the main loop").

use intellisat_core::{CurrentTask, ModeId, RunOutcome, StatusWord, TaskTable};

use crate::scheduler::PreemptionSignal;

/// All process-wide executive state, gathered into one value so the tick
/// thread and the superloop share a single handle instead of a scattering
/// of globals.
pub struct Executive {
    pub table: TaskTable,
    pub status: StatusWord,
    pub current_task: CurrentTask,
    pub preemption: PreemptionSignal,
}

impl Executive {
    pub fn new(table: TaskTable) -> Self {
        let initial = table.highest_priority().id;
        Self {
            table,
            status: StatusWord::new(),
            current_task: CurrentTask::new(initial),
            preemption: PreemptionSignal::new(),
        }
    }

    /// The narrow view the tick source needs: just enough to run
    /// [`crate::scheduler::scheduler`] once per period. Exposed as a method
    /// rather than handing out `&Executive` wholesale, per spec.md §9's
    /// "the ISR obtains access via a narrowly typed handle exposing only
    /// what the tick path needs."
    pub fn tick(&self) {
        crate::scheduler::scheduler(
            &self.table,
            self.status.mode.setter(),
            &self.current_task,
            &self.preemption,
        );
    }
}

/// Distinct from the arbiter (spec.md §4.5): consults `modeBits` only, never
/// runs `sense()`. Returns the highest-priority pending mode, or `fallback`
/// if no bit happens to be set (a window that shouldn't occur in normal
/// operation, since the arbiter always arms at least the default keep-alive,
/// but is handled rather than left to panic — see DESIGN.md).
pub fn mode_select(status: &StatusWord, fallback: ModeId) -> ModeId {
    status.mode.highest_priority_pending().unwrap_or_else(|| {
        log::warn!("mode_select: no mode pending, falling back to {fallback}");
        fallback
    })
}

/// Checked once per superloop iteration to support the test harness's
/// "terminate after N ticks" mode (spec.md §6); production flight code uses
/// [`never_stop`].
pub trait StopCondition {
    fn should_stop(&mut self) -> bool;
}

/// Runs forever — the flight configuration, matching spec.md §4.4's "There
/// is no terminal state; the loop is perpetual."
pub struct NeverStop;
impl StopCondition for NeverStop {
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// Runs the superloop described in spec.md §4.5 until `stop` says to quit.
///
/// Each iteration follows the SELECTING -> CONFIGURING(m) -> RUNNING(m)
/// state machine from spec.md §4.4:
/// 1. (reentry point — the top of this loop)
/// 2. `mode_select()` assigns `current_task`.
/// 3. `configure()` prepares the selected mode, then `current_task.run()`
///    is invoked.
/// 4. on `RunOutcome::Completed`, clears that mode's pending bit.
///    On `RunOutcome::Aborted` (the tick thread raised preemption while this
///    mode was running), invokes `clean()` instead and leaves the bit
///    pending — this crate resolves spec.md §9's open question in favor of
///    the "Recommended" behavior, which does invoke `clean()` here.
/// 5. loops.
pub fn run_superloop(exec: &Executive, stop: &mut dyn StopCondition) {
    loop {
        if stop.should_stop() {
            log::info!("run_superloop: stop condition met, exiting");
            return;
        }

        // Step 1: reentry point. A preemption that fired on the previous
        // iteration's run() has already been reacted to (bit left pending,
        // clean() invoked); clear the signal here so the next run() starts
        // unpreempted.
        exec.preemption.reset();

        // Step 2: mode-select (bit-read only, not a re-sense).
        let fallback = exec.current_task.get();
        let selected = mode_select(&exec.status, fallback);
        exec.current_task.set(selected);

        let entry = exec.table.lookup(selected);

        // The CONFIGURING(m) state from spec.md §4.4's per-iteration state
        // machine, between SELECTING and RUNNING. `configure()` is
        // idempotent (spec.md §3), which is exactly what lets a mode resume
        // from scratch after an abort instead of needing saved progress.
        (entry.configure)();

        // Step 3: invoke the mode body.
        log::info!("run_superloop: entering mode {selected}");
        let outcome = (entry.run)(&exec.preemption);

        // Step 4: react to the outcome.
        match outcome {
            RunOutcome::Completed => {
                log::info!("run_superloop: mode {selected} completed");
                exec.status.mode.clear(selected);
            }
            RunOutcome::Aborted => {
                log::info!("run_superloop: mode {selected} preempted, invoking clean()");
                (entry.clean)();
            }
        }

        // Step 5: loop back to step 1.
    }
}
