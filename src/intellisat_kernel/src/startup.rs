//! Cold/warm boot handling (spec.md §4.6, "Startup").

use core::time::Duration;

use intellisat_core::{RebootCount, Snapshot, SnapshotStore, StatusFlags, StatusWord};

/// The release-delay wait: a fixed mission parameter on cold boot, skipped
/// entirely on warm boot. Injected as a trait so `intellisat_kernel` stays
/// platform-agnostic; `intellisat_sim` backs it with `std::thread::sleep`,
/// and tests back it with a no-op.
pub trait ReleaseDelay {
    fn wait(&self, duration: Duration);
}

/// Runs once at the very top of program start, before the superloop
/// (spec.md §4.6).
///
/// * Cold boot (`START` clear): wait out the release delay, then set
///   `START`.
/// * Warm boot (`START` set): restore `status_bits`/`reboot_count` from the
///   snapshot collaborator. Restoring the snapshot medium itself is out of
///   scope (spec.md §1); only the trait boundary is exercised here.
///
/// Either way, `reboot_count` is incremented by exactly one before
/// returning, which is what keeps it strictly monotonic across boots
/// (spec.md §8).
pub fn startup<S: SnapshotStore>(
    status: &StatusWord,
    reboot_count: &RebootCount,
    snapshot: &mut S,
    release_delay: &dyn ReleaseDelay,
    release_delay_duration: Duration,
) -> Result<(), S::Error> {
    if status.status.test(StatusFlags::START) {
        log::info!("startup: warm boot, restoring persisted state");
        let Snapshot {
            status_bits,
            reboot_count: persisted_reboot_count,
        } = snapshot.restore()?;
        status.status.restore(status_bits);
        reboot_count.set(persisted_reboot_count);
    } else {
        log::info!("startup: cold boot, waiting out release delay");
        release_delay.wait(release_delay_duration);
        status.status.set(StatusFlags::START);
    }

    let count = reboot_count.increment();
    log::info!("startup: boot complete, reboot_count = {count}");
    Ok(())
}
