//! The hook for the external snapshot collaborator (spec.md §4.6, §6).
//!
//! Persistent flash snapshot/restore is explicitly out of scope (spec.md
//! §1): this module only defines the boundary a real implementation would
//! sit behind, plus the record that round-trips through it.

/// The record that round-trips through `save`/`restore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub status_bits: u32,
    pub reboot_count: u32,
}

/// An external collaborator capable of persisting and restoring a
/// [`Snapshot`] across a reboot. The storage medium (flash, a file, NVRAM)
/// is out of scope for this crate; only the trait boundary is specified.
pub trait SnapshotStore {
    type Error;

    fn save(&mut self, snapshot: Snapshot) -> Result<(), Self::Error>;
    fn restore(&mut self) -> Result<Snapshot, Self::Error>;
}
