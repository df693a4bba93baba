//! A hosted implementation of [`intellisat_kernel::ReleaseDelay`] (spec.md
//! §4.6's cold-boot release delay), backed by `std::thread::sleep`.

use std::time::Duration;

use intellisat_kernel::ReleaseDelay;

/// Blocks the calling thread for the requested duration. On real hardware
/// this would instead be a busy-wait or watchdog-fed delay loop; here a
/// plain sleep is the hosted equivalent.
#[derive(Debug, Default)]
pub struct ThreadSleepReleaseDelay;

impl ReleaseDelay for ThreadSleepReleaseDelay {
    fn wait(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A [`ReleaseDelay`] that returns immediately, for tests and for the
/// `--preset-start` CLI flag that asks to skip the cold-boot wait.
#[derive(Debug, Default)]
pub struct NoReleaseDelay;

impl ReleaseDelay for NoReleaseDelay {
    fn wait(&self, _duration: Duration) {}
}
