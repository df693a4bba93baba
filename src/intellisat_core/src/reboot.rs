//! `RebootCount`: a monotonically increasing counter persisted across boots
//! (spec.md §3). Persistence itself lives behind [`crate::SnapshotStore`];
//! this type only holds the in-memory value for the current boot.

use core::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Default)]
pub struct RebootCount(AtomicU32);

impl RebootCount {
    pub const fn new(initial: u32) -> Self {
        Self(AtomicU32::new(initial))
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: u32) {
        self.0.store(value, Ordering::SeqCst);
    }

    /// Increment by one, as `startup()` does unconditionally on every boot.
    pub fn increment(&self) -> u32 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}
