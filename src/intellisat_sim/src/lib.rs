//! Hosted simulation harness: a stand-in for the hardware and environment a
//! real executive would run against, grounded on `r3_port_std`'s role in the
//! teacher workspace (a std-backed port used to run kernel logic on a
//! development machine instead of target hardware).
//!
//! Nothing in `intellisat_core` or `intellisat_kernel` depends on this
//! crate; it exists purely to drive them for testing and for the CLI.

pub mod modes;
pub mod release_delay;
pub mod snapshot;
pub mod ticksource;

#[cfg(test)]
mod scenarios;

pub use modes::task_table;
pub use release_delay::{NoReleaseDelay, ThreadSleepReleaseDelay};
pub use snapshot::InMemorySnapshotStore;
pub use ticksource::{TickCountStop, TickSource};
