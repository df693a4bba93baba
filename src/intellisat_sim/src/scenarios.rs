//! End-to-end scenario tests tying `intellisat_core`, `intellisat_kernel`,
//! and this crate's simulation harness together, one test per row of the
//! end-to-end scenario table in spec.md §8.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use intellisat_core::{
    CancellationToken, ModeId, RunOutcome, StatusFlags, StatusWord, TaskEntry, TaskTable,
};
use intellisat_kernel::{run_superloop, startup, Executive, ReleaseDelay, StopCondition};

use crate::release_delay::NoReleaseDelay;
use crate::snapshot::InMemorySnapshotStore;

fn noop() {}
fn never() -> bool {
    false
}
fn run_complete(_: &dyn CancellationToken) -> RunOutcome {
    RunOutcome::Completed
}

fn table_with_senses(senses: [fn() -> bool; ModeId::COUNT]) -> TaskTable {
    TaskTable::new(ModeId::ALL.map(|id| TaskEntry {
        id,
        sense: senses[id.index()],
        configure: noop,
        run: run_complete,
        clean: noop,
    }))
}

/// Runs the superloop for exactly `n` iterations then stops, independent of
/// any real tick source (unlike [`crate::ticksource::TickCountStop`], which
/// counts ticks actually delivered by a [`crate::ticksource::TickSource`]).
struct IterationStop {
    remaining: u32,
}
impl StopCondition for IterationStop {
    fn should_stop(&mut self) -> bool {
        if self.remaining == 0 {
            true
        } else {
            self.remaining -= 1;
            false
        }
    }
}

// Row 1: cold boot, all senses false, startup -> systemsCheck -> 1 tick.
#[test]
fn scenario_cold_boot_all_senses_false_selects_ecc_and_clears() {
    let _ = env_logger::builder().is_test(true).try_init();
    let senses: [fn() -> bool; ModeId::COUNT] = [never, never, never, never, never, never];
    let table = table_with_senses(senses);
    let exec = Executive::new(table);

    let mut store = InMemorySnapshotStore::new();
    let reboot_count = intellisat_core::RebootCount::new(0);
    startup(
        &exec.status,
        &reboot_count,
        &mut store,
        &NoReleaseDelay,
        Duration::from_millis(1),
    )
    .unwrap();

    // One tick: no sense fires, so the arbiter arms the default keep-alive.
    exec.tick();
    assert!(exec.status.mode.test(ModeId::Ecc));

    let mut stop = IterationStop { remaining: 1 };
    run_superloop(&exec, &mut stop);

    assert_eq!(exec.current_task.get(), ModeId::Ecc);
    assert_eq!(exec.status.mode.bits(), 0);
}

// Row 2: warm boot (START=1), only DETUMBLE senses true, 1 tick.
#[test]
fn scenario_warm_boot_detumble_only_runs_and_clears() {
    fn sense_detumble() -> bool {
        true
    }
    let senses: [fn() -> bool; ModeId::COUNT] =
        [never, sense_detumble, never, never, never, never];
    let table = table_with_senses(senses);
    let exec = Executive::new(table);
    exec.status.status.set(StatusFlags::START);

    let mut store = InMemorySnapshotStore::new();
    let reboot_count = intellisat_core::RebootCount::new(0);
    startup(
        &exec.status,
        &reboot_count,
        &mut store,
        &NoReleaseDelay,
        Duration::from_millis(1),
    )
    .unwrap();

    exec.tick();
    assert!(exec.status.mode.test(ModeId::Detumble));

    let mut stop = IterationStop { remaining: 1 };
    run_superloop(&exec, &mut stop);

    assert_eq!(exec.current_task.get(), ModeId::Detumble);
    assert!(!exec.status.mode.test(ModeId::Detumble));
}

// Row 3: CHARGING and HDD both sense true; CHARGING (higher priority) wins
// and HDD's bit remains pending.
#[test]
fn scenario_charging_and_hdd_both_pending_charging_wins() {
    fn sense_charging() -> bool {
        true
    }
    fn sense_hdd() -> bool {
        true
    }
    let senses: [fn() -> bool; ModeId::COUNT] =
        [sense_charging, never, never, sense_hdd, never, never];
    let table = table_with_senses(senses);
    let exec = Executive::new(table);

    exec.tick();
    assert!(exec.status.mode.test(ModeId::Charging));
    assert!(exec.status.mode.test(ModeId::Hdd));

    let mut stop = IterationStop { remaining: 1 };
    run_superloop(&exec, &mut stop);

    assert_eq!(exec.current_task.get(), ModeId::Charging);
    assert!(!exec.status.mode.test(ModeId::Charging));
    assert!(exec.status.mode.test(ModeId::Hdd), "HDD stays pending");
}

// Row 4: HDD is running; mid-run, CHARGING's sense becomes true. The tick
// that observes it raises preemption; HDD's run() notices, aborts, clean()
// runs, and the bit stays pending; the next iteration selects CHARGING.
#[test]
fn scenario_mid_run_preemption_reenters_on_higher_priority() {
    static CHARGING_SENSES_TRUE: AtomicBool = AtomicBool::new(false);
    static CLEAN_RAN: AtomicBool = AtomicBool::new(false);

    CHARGING_SENSES_TRUE.store(false, Ordering::SeqCst);
    CLEAN_RAN.store(false, Ordering::SeqCst);

    fn sense_charging() -> bool {
        CHARGING_SENSES_TRUE.load(Ordering::SeqCst)
    }
    fn run_hdd_polling(token: &dyn CancellationToken) -> RunOutcome {
        let deadline = std::time::Instant::now() + Duration::from_millis(200);
        loop {
            if token.is_cancelled() {
                return RunOutcome::Aborted;
            }
            if std::time::Instant::now() >= deadline {
                return RunOutcome::Completed;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }
    fn clean_hdd() {
        CLEAN_RAN.store(true, Ordering::SeqCst);
    }

    let table = TaskTable::new(ModeId::ALL.map(|id| TaskEntry {
        id,
        sense: if id == ModeId::Charging {
            sense_charging as fn() -> bool
        } else {
            never
        },
        configure: noop,
        run: if id == ModeId::Hdd {
            run_hdd_polling as fn(&dyn CancellationToken) -> RunOutcome
        } else {
            run_complete
        },
        clean: if id == ModeId::Hdd { clean_hdd } else { noop },
    }));
    let exec = Arc::new(Executive::new(table));
    exec.status.mode.setter().set(ModeId::Hdd);
    exec.current_task.set(ModeId::Hdd);

    let exec_for_mid_run = Arc::clone(&exec);
    let preempt_thread = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        CHARGING_SENSES_TRUE.store(true, Ordering::SeqCst);
        exec_for_mid_run.tick();
    });

    let mut stop = IterationStop { remaining: 1 };
    run_superloop(&exec, &mut stop);

    preempt_thread.join().unwrap();

    assert!(exec.status.mode.test(ModeId::Hdd), "HDD stays pending");
    assert!(CLEAN_RAN.load(Ordering::SeqCst), "clean() ran on abort");

    // Next iteration re-enters mode selection and picks CHARGING.
    let mut stop = IterationStop { remaining: 1 };
    run_superloop(&exec, &mut stop);
    assert!(!exec.status.mode.test(ModeId::Charging));
}

// Row 5: test harness N=3, run to completion; the superloop returns after
// exactly 3 ticks' worth of iterations (a process exit-code scenario,
// exercised here as the dispatcher's tick-counted run-to-completion path).
#[test]
fn scenario_bounded_run_executes_exactly_n_iterations() {
    static ITER_COUNT: AtomicU32 = AtomicU32::new(0);
    ITER_COUNT.store(0, Ordering::SeqCst);
    fn run_counting(_: &dyn CancellationToken) -> RunOutcome {
        ITER_COUNT.fetch_add(1, Ordering::SeqCst);
        RunOutcome::Completed
    }

    let table = TaskTable::new(ModeId::ALL.map(|id| TaskEntry {
        id,
        sense: never,
        configure: noop,
        run: run_counting,
        clean: noop,
    }));
    let exec = Executive::new(table);
    exec.status.mode.setter().set(ModeId::Ecc);

    let mut stop = IterationStop { remaining: 3 };
    run_superloop(&exec, &mut stop);

    assert_eq!(ITER_COUNT.load(Ordering::SeqCst), 3);
}

// Row 6: START flag preset via a CLI-equivalent arg; startup must skip the
// release-wait and the superloop is entered immediately.
#[test]
fn scenario_preset_start_skips_release_delay() {
    use std::cell::Cell;

    struct CountingDelay(Cell<u32>);
    impl ReleaseDelay for CountingDelay {
        fn wait(&self, _duration: Duration) {
            self.0.set(self.0.get() + 1);
        }
    }

    let status = StatusWord::new();
    status.status.set(StatusFlags::START);
    let reboot_count = intellisat_core::RebootCount::new(0);
    let mut store = InMemorySnapshotStore::new();
    let delay = CountingDelay(Cell::new(0));

    startup(
        &status,
        &reboot_count,
        &mut store,
        &delay,
        Duration::from_secs(10),
    )
    .unwrap();

    assert_eq!(delay.0.get(), 0, "preset START must skip the release delay");

    // The superloop is then free to run immediately, with no wait observed.
    let table = TaskTable::new(ModeId::ALL.map(|id| TaskEntry {
        id,
        sense: never,
        configure: noop,
        run: run_complete,
        clean: noop,
    }));
    let exec = Executive::new(table);
    exec.status.mode.setter().set(ModeId::Ecc);
    let mut stop = IterationStop { remaining: 1 };
    run_superloop(&exec, &mut stop);
    assert_eq!(exec.current_task.get(), ModeId::Ecc);
}
