//! Error types for programming errors (spec.md §7, kind 1).
//!
//! These are the only failures the core/arbiter/dispatcher can report to
//! each other; they are never recoverable and the dispatcher's top-level
//! loop treats them as fatal.

use core::fmt;

/// A programming error: corrupt task table state or an out-of-range mode
/// identifier. Always fatal; there is no recovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalError {
    /// A mode index outside `0..ModeId::COUNT` was used to index the task
    /// table.
    BadModeId { index: usize },
    /// [`crate::task::TaskTable::lookup`] returned an entry whose `id` does
    /// not match the index it was looked up at.
    TaskTableCorrupt { index: usize },
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalError::BadModeId { index } => {
                write!(f, "mode index {index} is out of range")
            }
            FatalError::TaskTableCorrupt { index } => {
                write!(f, "task table entry at index {index} has a mismatched id")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FatalError {}
