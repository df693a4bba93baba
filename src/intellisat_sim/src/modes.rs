//! Concrete `(sense, configure, run, clean)` bodies for the six modes.
//!
//! spec.md treats these as opaque effectful procedures (§1's "body of the
//! per-mode work routines themselves" is explicitly out of scope). A
//! runnable simulation needs *something* behind the function pointers,
//! though, so this module supplies deterministic stand-ins driven by a
//! small internal spacecraft-state model rather than real sensor I/O.
//!
//! `sense`/`configure`/`run`/`clean` are plain `fn` pointers (spec.md §3),
//! so none of them can close over per-instance state; the spacecraft state
//! lives in process-wide atomics instead, exactly as the task table itself
//! is process-wide.

use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::time::{Duration, Instant};

use intellisat_core::{CancellationToken, ModeId, RunOutcome, TaskEntry, TaskTable};

/// A minimal model of the conditions the six modes' `sense()` functions
/// react to. All fields are atomics so the plain `fn()` sense/configure/run
/// bodies can read and update them without capturing anything.
struct SpacecraftState {
    /// Battery state of charge, in milli-percent (0..=100_000).
    battery_charge_mpct: AtomicI32,
    /// Body angular rate magnitude, in micro-radians/second.
    angular_rate_urad_s: AtomicI32,
    /// Depth of the pending uplink command queue.
    uplink_queue_depth: AtomicU32,
    /// Heater duty-cycle diagnostic due counter; HDD runs when this reaches
    /// zero, then resets.
    hdd_due_in: AtomicU32,
    /// Momentum-wheel desaturation due counter; MRW runs when this reaches
    /// zero, then resets.
    mrw_due_in: AtomicU32,
}

const CHARGING_THRESHOLD_MPCT: i32 = 30_000; // below 30% SoC, charge
const DETUMBLE_THRESHOLD_URAD_S: i32 = 50_000; // above this rate, detumble
const COMMS_QUEUE_THRESHOLD: u32 = 1; // any queued uplink commands
const HDD_PERIOD_TICKS: u32 = 50;
const MRW_PERIOD_TICKS: u32 = 75;

static STATE: SpacecraftState = SpacecraftState {
    battery_charge_mpct: AtomicI32::new(60_000),
    angular_rate_urad_s: AtomicI32::new(5_000),
    uplink_queue_depth: AtomicU32::new(0),
    hdd_due_in: AtomicU32::new(HDD_PERIOD_TICKS),
    mrw_due_in: AtomicU32::new(MRW_PERIOD_TICKS),
};

/// Resets the shared spacecraft-state model to its defaults. Intended for
/// tests, which otherwise observe whatever the last test left behind (the
/// state is a single process-wide static, same as the real task table).
pub fn reset_state() {
    STATE.battery_charge_mpct.store(60_000, Ordering::SeqCst);
    STATE.angular_rate_urad_s.store(5_000, Ordering::SeqCst);
    STATE.uplink_queue_depth.store(0, Ordering::SeqCst);
    STATE.hdd_due_in.store(HDD_PERIOD_TICKS, Ordering::SeqCst);
    STATE.mrw_due_in.store(MRW_PERIOD_TICKS, Ordering::SeqCst);
}

/// Nudges the model forward, as if one tick's worth of physical time has
/// passed. Not part of the spec's component model; this is what makes
/// `sense()` results change over the course of a simulation run instead of
/// being frozen at their initial values.
pub fn advance_environment() {
    STATE.battery_charge_mpct.fetch_sub(50, Ordering::SeqCst);
    STATE.angular_rate_urad_s.fetch_add(200, Ordering::SeqCst);
    if STATE.hdd_due_in.load(Ordering::SeqCst) > 0 {
        STATE.hdd_due_in.fetch_sub(1, Ordering::SeqCst);
    }
    if STATE.mrw_due_in.load(Ordering::SeqCst) > 0 {
        STATE.mrw_due_in.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Feeds an uplink command into the simulated queue, e.g. from the CLI or a
/// test, so `sense_comms` has something to react to.
pub fn enqueue_uplink_command() {
    STATE.uplink_queue_depth.fetch_add(1, Ordering::SeqCst);
}

fn simulate_work(
    token: &dyn CancellationToken,
    label: &str,
    total: Duration,
    poll_interval: Duration,
) -> RunOutcome {
    let deadline = Instant::now() + total;
    loop {
        if token.is_cancelled() {
            log::debug!("{label}: preempted mid-run");
            return RunOutcome::Aborted;
        }
        let now = Instant::now();
        if now >= deadline {
            return RunOutcome::Completed;
        }
        std::thread::sleep(poll_interval.min(deadline - now));
    }
}

// ---- CHARGING --------------------------------------------------------

pub fn sense_charging() -> bool {
    STATE.battery_charge_mpct.load(Ordering::SeqCst) < CHARGING_THRESHOLD_MPCT
}

pub fn configure_charging() {
    log::debug!("configure_charging: enabling solar array MPPT");
}

pub fn run_charging(token: &dyn CancellationToken) -> RunOutcome {
    log::info!("run_charging: drawing panel current onto the bus");
    let outcome = simulate_work(
        token,
        "run_charging",
        Duration::from_millis(40),
        Duration::from_millis(5),
    );
    if outcome == RunOutcome::Completed {
        STATE.battery_charge_mpct.fetch_add(5_000, Ordering::SeqCst);
    }
    outcome
}

pub fn clean_charging() {
    log::debug!("clean_charging: releasing MPPT control");
}

// ---- DETUMBLE ----------------------------------------------------------

pub fn sense_detumble() -> bool {
    STATE.angular_rate_urad_s.load(Ordering::SeqCst) > DETUMBLE_THRESHOLD_URAD_S
}

pub fn configure_detumble() {
    log::debug!("configure_detumble: arming magnetorquers");
}

pub fn run_detumble(token: &dyn CancellationToken) -> RunOutcome {
    log::info!("run_detumble: applying B-dot control law");
    let outcome = simulate_work(
        token,
        "run_detumble",
        Duration::from_millis(60),
        Duration::from_millis(5),
    );
    if outcome == RunOutcome::Completed {
        STATE.angular_rate_urad_s.fetch_sub(20_000, Ordering::SeqCst);
    }
    outcome
}

pub fn clean_detumble() {
    log::debug!("clean_detumble: de-energizing magnetorquers");
}

// ---- COMMS ---------------------------------------------------------------

pub fn sense_comms() -> bool {
    STATE.uplink_queue_depth.load(Ordering::SeqCst) >= COMMS_QUEUE_THRESHOLD
}

pub fn configure_comms() {
    log::debug!("configure_comms: pointing high-gain antenna");
}

pub fn run_comms(token: &dyn CancellationToken) -> RunOutcome {
    log::info!("run_comms: draining uplink queue");
    let outcome = simulate_work(
        token,
        "run_comms",
        Duration::from_millis(30),
        Duration::from_millis(5),
    );
    if outcome == RunOutcome::Completed && STATE.uplink_queue_depth.load(Ordering::SeqCst) > 0 {
        STATE.uplink_queue_depth.fetch_sub(1, Ordering::SeqCst);
    }
    outcome
}

pub fn clean_comms() {
    log::debug!("clean_comms: stowing high-gain antenna");
}

// ---- HDD (heater duty-cycle diagnostic) -----------------------------------

pub fn sense_hdd() -> bool {
    STATE.hdd_due_in.load(Ordering::SeqCst) == 0
}

pub fn configure_hdd() {
    log::debug!("configure_hdd: selecting heater diagnostic channel");
}

pub fn run_hdd(token: &dyn CancellationToken) -> RunOutcome {
    log::info!("run_hdd: cycling heater duty diagnostic");
    let outcome = simulate_work(
        token,
        "run_hdd",
        Duration::from_millis(20),
        Duration::from_millis(5),
    );
    if outcome == RunOutcome::Completed {
        STATE.hdd_due_in.store(HDD_PERIOD_TICKS, Ordering::SeqCst);
    }
    outcome
}

pub fn clean_hdd() {
    log::debug!("clean_hdd: releasing heater diagnostic channel");
}

// ---- MRW (momentum-wheel desaturation) ------------------------------------

pub fn sense_mrw() -> bool {
    STATE.mrw_due_in.load(Ordering::SeqCst) == 0
}

pub fn configure_mrw() {
    log::debug!("configure_mrw: arming desaturation torque rods");
}

pub fn run_mrw(token: &dyn CancellationToken) -> RunOutcome {
    log::info!("run_mrw: desaturating reaction wheels");
    let outcome = simulate_work(
        token,
        "run_mrw",
        Duration::from_millis(35),
        Duration::from_millis(5),
    );
    if outcome == RunOutcome::Completed {
        STATE.mrw_due_in.store(MRW_PERIOD_TICKS, Ordering::SeqCst);
    }
    outcome
}

pub fn clean_mrw() {
    log::debug!("clean_mrw: disarming torque rods");
}

// ---- ECC (default keep-alive) ---------------------------------------------

/// ECC's sense is tautological (spec.md §9's "the tautological `batteryTime`
/// sense") — it never fires on its own; ECC only ever runs because the
/// arbiter arms it as the fallback when no other mode is pending.
pub fn sense_ecc() -> bool {
    false
}

pub fn configure_ecc() {
    log::debug!("configure_ecc: idling on keep-alive housekeeping");
}

pub fn run_ecc(token: &dyn CancellationToken) -> RunOutcome {
    log::info!("run_ecc: keep-alive housekeeping pass");
    simulate_work(
        token,
        "run_ecc",
        Duration::from_millis(10),
        Duration::from_millis(5),
    )
}

pub fn clean_ecc() {
    log::debug!("clean_ecc: nothing to release");
}

/// Assembles the static task table from the mode bodies above, in the
/// declaration/priority order defined by [`ModeId`] (spec.md §4.2's
/// "Ordered by mode identifier for O(1) lookup").
pub fn task_table() -> TaskTable {
    TaskTable::new([
        TaskEntry {
            id: ModeId::Charging,
            sense: sense_charging,
            configure: configure_charging,
            run: run_charging,
            clean: clean_charging,
        },
        TaskEntry {
            id: ModeId::Detumble,
            sense: sense_detumble,
            configure: configure_detumble,
            run: run_detumble,
            clean: clean_detumble,
        },
        TaskEntry {
            id: ModeId::Comms,
            sense: sense_comms,
            configure: configure_comms,
            run: run_comms,
            clean: clean_comms,
        },
        TaskEntry {
            id: ModeId::Hdd,
            sense: sense_hdd,
            configure: configure_hdd,
            run: run_hdd,
            clean: clean_hdd,
        },
        TaskEntry {
            id: ModeId::Mrw,
            sense: sense_mrw,
            configure: configure_mrw,
            run: run_mrw,
            clean: clean_mrw,
        },
        TaskEntry {
            id: ModeId::Ecc,
            sense: sense_ecc,
            configure: configure_ecc,
            run: run_ecc,
            clean: clean_ecc,
        },
    ])
}
