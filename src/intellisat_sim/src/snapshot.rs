//! A stand-in for the external snapshot collaborator (spec.md §1, §4.6).
//!
//! Persistent flash storage is out of scope; this is the in-memory
//! implementation used by the CLI test harness and by tests, satisfying the
//! `SnapshotStore` trait boundary without claiming to model real storage.

use std::convert::Infallible;

use intellisat_core::{Snapshot, SnapshotStore};

/// Round-trips a [`Snapshot`] through a plain field, nothing more.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    record: Snapshot,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a store pre-loaded with a record, as the CLI does when the
    /// `--preset-start` flag asks to skip the cold-boot wait.
    pub fn preloaded(record: Snapshot) -> Self {
        Self { record }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    type Error = Infallible;

    fn save(&mut self, snapshot: Snapshot) -> Result<(), Infallible> {
        self.record = snapshot;
        Ok(())
    }

    fn restore(&mut self) -> Result<Snapshot, Infallible> {
        Ok(self.record)
    }
}
