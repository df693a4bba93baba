//! The fixed set of operational modes and their priority ordering.

use core::fmt;

/// A spacecraft operational mode.
///
/// Declaration order is priority order, highest first. This also doubles as
/// the bit index into [`crate::status::ModeBits`] and the index into
/// [`crate::task::TaskTable`]; [`ModeId::ALL`] is the canonical iteration
/// order used by the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ModeId {
    Charging = 0,
    Detumble = 1,
    Comms = 2,
    Hdd = 3,
    Mrw = 4,
    Ecc = 5,
}

impl ModeId {
    /// All modes, in priority order (highest first).
    pub const ALL: [ModeId; 6] = [
        ModeId::Charging,
        ModeId::Detumble,
        ModeId::Comms,
        ModeId::Hdd,
        ModeId::Mrw,
        ModeId::Ecc,
    ];

    /// The number of modes. Also the width, in bits, of a mode bitset.
    pub const COUNT: usize = ModeId::ALL.len();

    /// The default keep-alive mode selected when no mode's `sense()` fires.
    pub const DEFAULT: ModeId = ModeId::Ecc;

    /// This mode's index into [`ModeId::ALL`] / [`crate::task::TaskTable`].
    ///
    /// Lower index means higher priority.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// This mode's bit position in a [`crate::status::ModeBits`] value.
    pub const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Look up a mode by its table index.
    ///
    /// Returns `None` for indices outside `0..ModeId::COUNT`; callers that
    /// treat an out-of-range index as a programming error should convert
    /// that `None` into [`crate::error::FatalError::BadModeId`].
    pub const fn from_index(index: usize) -> Option<ModeId> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModeId::Charging => "CHARGING",
            ModeId::Detumble => "DETUMBLE",
            ModeId::Comms => "COMMS",
            ModeId::Hdd => "HDD",
            ModeId::Mrw => "MRW",
            ModeId::Ecc => "ECC",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_matches_declaration_order() {
        for (i, m) in ModeId::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }

    #[test]
    fn charging_is_highest_priority() {
        assert_eq!(ModeId::ALL[0], ModeId::Charging);
    }

    #[test]
    fn default_mode_is_ecc() {
        assert_eq!(ModeId::DEFAULT, ModeId::Ecc);
    }

    #[test]
    fn bits_are_distinct_powers_of_two() {
        let mut seen = 0u32;
        for m in ModeId::ALL {
            assert_eq!(seen & m.bit(), 0, "bit for {m} collides");
            seen |= m.bit();
        }
    }

    #[test]
    fn from_index_round_trips() {
        for m in ModeId::ALL {
            assert_eq!(ModeId::from_index(m.index()), Some(m));
        }
        assert_eq!(ModeId::from_index(ModeId::COUNT), None);
    }
}
