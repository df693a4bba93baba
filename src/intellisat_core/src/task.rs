//! The static task table: one entry per [`ModeId`], each holding the
//! `(sense, configure, run, clean)` quadruple of effect procedures.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::error::FatalError;
use crate::mode::ModeId;

/// Why a mode's `run()` returned.
///
/// spec.md's original design aborts `run()` asynchronously via a non-local
/// jump and never distinguishes the two cases to the dispatcher; this crate
/// implements the recommended, cooperative-cancellation redesign from
/// spec.md §9, under which `run()` itself reports whether it ran to
/// completion or noticed the cancellation token and gave up early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The mode body ran to completion. The dispatcher clears this mode's
    /// pending bit.
    Completed,
    /// The mode body observed the cancellation token and returned early.
    /// The dispatcher leaves this mode's pending bit set and invokes
    /// `clean()` before the next mode selection.
    Aborted,
}

/// A cooperative cancellation signal, polled by `run()` bodies at bounded
/// intervals. Set by the scheduler (tick thread) when it decides the running
/// mode should be preempted; cleared by the dispatcher once it has reacted.
///
/// This is the concrete realization of spec.md §9's "Recommended: ... the
/// dispatcher holds a cancellation flag set by the tick handler; `run()`
/// procedures poll it at bounded intervals."
pub trait CancellationToken {
    /// True if the currently running mode should abort its remaining work.
    fn is_cancelled(&self) -> bool;
}

/// One mode's capability record.
///
/// `sense`, `configure`, and `clean` take no arguments beyond `&self` being
/// implicit (they are plain function pointers, matching spec.md §3's "pure
/// in the sense of not mutating the task table itself"). `run` additionally
/// takes the cancellation token so it can poll for preemption.
#[derive(Clone, Copy)]
pub struct TaskEntry {
    pub id: ModeId,
    pub sense: fn() -> bool,
    pub configure: fn(),
    pub run: fn(&dyn CancellationToken) -> RunOutcome,
    pub clean: fn(),
}

impl core::fmt::Debug for TaskEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskEntry").field("id", &self.id).finish()
    }
}

/// The static, construction-time-only catalogue of mode entries, ordered by
/// [`ModeId::index`] for O(1) lookup.
pub struct TaskTable {
    entries: [TaskEntry; ModeId::COUNT],
}

impl TaskTable {
    /// Build a task table. Panics (a programming error, per spec.md §4.2) if
    /// any entry's `id` does not match its declaration position; the table
    /// is assembled once, at startup, from a `const`-checkable literal, so
    /// there is no runtime path where this should ever fire.
    pub const fn new(entries: [TaskEntry; ModeId::COUNT]) -> Self {
        // `for` is unusable in `const fn` over arrays of non-Copy length
        // generics here, so check the small fixed-size table by hand.
        let mut i = 0;
        while i < ModeId::COUNT {
            assert!(entries[i].id.index() == i, "task table entry out of order");
            i += 1;
        }
        Self { entries }
    }

    /// Look up an entry by mode identifier. Infallible: `ModeId` is the only
    /// key type, so this can never be out of range.
    pub fn lookup(&self, id: ModeId) -> &TaskEntry {
        &self.entries[id.index()]
    }

    /// Look up an entry by raw table index, as used when restoring
    /// `currTask` from a stored index. Out-of-range indices are a
    /// programming error (spec.md §4.2).
    pub fn lookup_index(&self, index: usize) -> Result<&TaskEntry, FatalError> {
        let entry = self
            .entries
            .get(index)
            .ok_or(FatalError::BadModeId { index })?;
        if entry.id.index() != index {
            return Err(FatalError::TaskTableCorrupt { index });
        }
        Ok(entry)
    }

    /// Iterate entries in priority order (highest first).
    pub fn iter(&self) -> impl Iterator<Item = &TaskEntry> {
        self.entries.iter()
    }

    /// The highest-priority entry, used as the initial `currTask` before the
    /// first mode selection (spec.md §4.4's initial state).
    pub fn highest_priority(&self) -> &TaskEntry {
        &self.entries[0]
    }
}

/// The single slot holding the mode selected for this iteration of the
/// superloop (spec.md §3's "CurrentTask").
///
/// Written by the dispatcher after consulting the arbiter/mode-select; read
/// by the scheduler (tick thread) to decide whether the running mode should
/// be preempted. A single `AtomicUsize` storing the table index is
/// sufficient for the "single-word assignment, readable concurrently with
/// the tick thread" requirement in spec.md §5.
#[derive(Debug, Default)]
pub struct CurrentTask(AtomicUsize);

impl CurrentTask {
    pub const fn new(initial: ModeId) -> Self {
        Self(AtomicUsize::new(initial.index()))
    }

    pub fn get(&self) -> ModeId {
        let index = self.0.load(Ordering::SeqCst);
        ModeId::from_index(index).expect("CurrentTask always holds a valid index")
    }

    pub fn set(&self, mode: ModeId) {
        self.0.store(mode.index(), Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysCancelled;
    impl CancellationToken for AlwaysCancelled {
        fn is_cancelled(&self) -> bool {
            true
        }
    }

    fn noop() {}
    fn never() -> bool {
        false
    }
    fn run_ok(_: &dyn CancellationToken) -> RunOutcome {
        RunOutcome::Completed
    }

    fn table() -> TaskTable {
        TaskTable::new(ModeId::ALL.map(|id| TaskEntry {
            id,
            sense: never,
            configure: noop,
            run: run_ok,
            clean: noop,
        }))
    }

    #[test]
    fn lookup_returns_matching_id() {
        let t = table();
        for id in ModeId::ALL {
            assert_eq!(t.lookup(id).id, id);
        }
    }

    #[test]
    fn lookup_index_rejects_out_of_range() {
        let t = table();
        assert_eq!(
            t.lookup_index(ModeId::COUNT),
            Err(FatalError::BadModeId {
                index: ModeId::COUNT
            })
        );
    }

    #[test]
    fn highest_priority_is_charging() {
        let t = table();
        assert_eq!(t.highest_priority().id, ModeId::Charging);
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn new_panics_on_misordered_table() {
        let mut entries = ModeId::ALL.map(|id| TaskEntry {
            id,
            sense: never,
            configure: noop,
            run: run_ok,
            clean: noop,
        });
        entries.swap(0, 1);
        let _ = TaskTable::new(entries);
    }

    #[test]
    fn current_task_round_trips() {
        let current = CurrentTask::new(ModeId::Charging);
        assert_eq!(current.get(), ModeId::Charging);
        current.set(ModeId::Hdd);
        assert_eq!(current.get(), ModeId::Hdd);
    }
}
