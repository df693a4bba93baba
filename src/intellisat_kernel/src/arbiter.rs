//! The priority arbiter (spec.md §4.3, "SystemsCheck").

use intellisat_core::{ModeBitsSetter, ModeId, TaskTable};

/// Consult each mode's `sense()` in priority order, OR the corresponding bit
/// into `mode_bits` for every mode whose sense fires, then return the
/// highest-priority mode with its bit set in `mode_bits` (not just the modes
/// sensed true this call — a mode left pending from an earlier tick is
/// reconsidered here too, per spec.md §4.3's "pending-but-not-selected modes
/// remain pending").
///
/// If no bit ends up set, `ECC` is armed as the default keep-alive and
/// returned (spec.md §4.3's policy detail).
///
/// `mode_bits` is deliberately typed as [`ModeBitsSetter`]: this function
/// runs on the tick thread (spec.md §5) and must never clear a bit — only
/// the dispatcher, on the main thread, does that.
pub fn systems_check(table: &TaskTable, mode_bits: ModeBitsSetter<'_>) -> ModeId {
    for entry in table.iter() {
        if (entry.sense)() {
            log::trace!("systems_check: {} sense fired", entry.id);
            mode_bits.set(entry.id);
        }
    }

    match mode_bits.highest_priority_pending() {
        Some(mode) => mode,
        None => {
            log::trace!("systems_check: no mode pending, arming default keep-alive ECC");
            mode_bits.set(ModeId::DEFAULT);
            ModeId::DEFAULT
        }
    }
}
