//! Test harness for the Intellisat flight executive (spec.md §6), grounded on
//! `r3_test_runner`'s `main`/`Opt`/`main_inner` split: parse arguments, set up
//! logging, run the thing, map a fatal error onto a non-zero exit code.
//!
//! This binary is explicitly out of the flight-core scope (spec.md §1); it
//! exists to drive `intellisat_kernel` and `intellisat_sim` against a hosted
//! simulation for development and for the scenario table in spec.md §8.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use intellisat_core::{Snapshot, StatusFlags};
use intellisat_kernel::{startup, Executive};
use intellisat_sim::{InMemorySnapshotStore, TickCountStop, TickSource, ThreadSleepReleaseDelay};

/// Errors specific to the harness itself, as opposed to the flight executive
/// it drives. Kept distinct from [`intellisat_core::FatalError`] the same
/// way `r3_test_runner`'s own error enums stay distinct from the kernel
/// errors they wrap, and converted to `anyhow::Error` at the call site.
#[derive(Debug, thiserror::Error)]
enum HarnessError {
    #[error("'{0}' is not a recognized log level (expected one of: off, error, warn, info, debug, trace)")]
    InvalidLogLevel(String),
}

/// Intellisat flight executive test harness
#[derive(Parser)]
struct Opt {
    /// Terminate after this many ticks (runs forever if omitted)
    ticks: Option<u32>,
    /// If `1`, pre-set the START status flag so startup takes the warm-boot
    /// path (restoring from the in-memory snapshot store) instead of waiting
    /// out the cold-boot release delay
    preset_start: Option<u8>,
    /// Tick period, in microseconds
    #[arg(long = "tick-micros", default_value = "10000")]
    tick_micros: u64,
    /// Log level forwarded to `env_logger`
    #[arg(long = "log-level", ignore_case = true, default_value = "info")]
    log_level: String,
}

/// The run parameters the harness actually needs, distilled from [`Opt`].
/// Kept separate from the `clap`-derived struct so the rest of `run` doesn't
/// depend on argument-parsing details (defaults, flag names) it has no
/// business knowing about.
struct Config {
    ticks: Option<u32>,
    preset_start: bool,
    tick_period: Duration,
    release_delay_duration: Duration,
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Self {
            ticks: opt.ticks,
            preset_start: opt.preset_start == Some(1),
            tick_period: Duration::from_micros(opt.tick_micros),
            release_delay_duration: Duration::from_secs(1),
        }
    }
}

fn main() {
    let opt = Opt::parse();

    // Validated before the logger is set up, so a bad flag is reported
    // directly rather than through a log line nobody configured yet.
    if opt.log_level.parse::<log::LevelFilter>().is_err() {
        eprintln!(
            "intellisat: {}",
            HarnessError::InvalidLogLevel(opt.log_level.clone())
        );
        std::process::exit(2);
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("intellisat={}", opt.log_level)),
    )
    .init();

    if let Err(e) = run(opt) {
        log::error!("intellisat: fatal error.\n{e:?}");
        std::process::exit(1);
    }
}

fn run(opt: Opt) -> anyhow::Result<()> {
    let config = Config::from(&opt);

    let table = intellisat_sim::task_table();
    let exec = Arc::new(Executive::new(table));

    // Preloading the store with the bits `startup`'s warm-boot branch is
    // about to restore is what makes presetting START actually skip the
    // release delay instead of having the empty default snapshot immediately
    // clear the flag back out (see `InMemorySnapshotStore::preloaded`).
    let mut snapshot_store = if config.preset_start {
        exec.status.status.set(StatusFlags::START);
        InMemorySnapshotStore::preloaded(Snapshot {
            status_bits: StatusFlags::START.bits(),
            reboot_count: 0,
        })
    } else {
        InMemorySnapshotStore::new()
    };
    let reboot_count = intellisat_core::RebootCount::new(0);
    let release_delay = ThreadSleepReleaseDelay;
    startup(
        &exec.status,
        &reboot_count,
        &mut snapshot_store,
        &release_delay,
        config.release_delay_duration,
    )
    .context("startup failed")?;

    // Spec.md §4.5: "After startup() and an initial systemsCheck()..." — seed
    // mode_bits before the superloop's first iteration, or else
    // `mode_select`'s empty-`mode_bits` fallback dispatches whatever
    // `Executive::new` seeded `current_task` with (the highest-priority
    // table entry) instead of the arbiter's actual pick.
    exec.tick();

    let source = TickSource::start(Arc::clone(&exec), config.tick_period);

    match config.ticks {
        Some(limit) => {
            let ticks = source.ticks_elapsed();
            let mut stop = TickCountStop::new(ticks, limit);
            intellisat_kernel::run_superloop(&exec, &mut stop);
        }
        None => {
            let mut stop = intellisat_kernel::NeverStop;
            intellisat_kernel::run_superloop(&exec, &mut stop);
        }
    }

    source.stop();
    Ok(())
}
