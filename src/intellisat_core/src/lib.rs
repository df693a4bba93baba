//! Pure data types and the static task table for the Intellisat flight
//! executive: the status word, the mode identifier, and the task table.
//!
//! This crate mirrors the role `r3_core` plays for the R3 kernel: it defines
//! the shared vocabulary (`ModeId`, `StatusWord`, `TaskEntry`, `TaskTable`)
//! with no scheduling policy and no platform dependency, so that
//! `intellisat_kernel` (the scheduling algorithms) and `intellisat_sim` (the
//! hosted simulation) can both build on it without depending on each other.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod mode;
pub mod reboot;
pub mod snapshot;
pub mod status;
pub mod task;

pub use error::FatalError;
pub use mode::ModeId;
pub use reboot::RebootCount;
pub use snapshot::{Snapshot, SnapshotStore};
pub use status::{ModeBits, ModeBitsSetter, StatusBits, StatusFlags, StatusWord};
pub use task::{CancellationToken, CurrentTask, RunOutcome, TaskEntry, TaskTable};
