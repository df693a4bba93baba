//! The status word: two atomic bit-fields, `status` and `mode`.
//!
//! Both fields must be atomic with respect to the tick thread (spec.md §4.1,
//! §5). Rather than a single `set(field, bit)` entry point keyed by a
//! runtime `field` tag, each field gets its own small wrapper type so the
//! compiler enforces which bit-set a caller is touching, and so the writer
//! discipline from spec.md §5 ("the arbiter may only set mode bits; the
//! dispatcher only clears them") is expressed as distinct capabilities
//! instead of a convention.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::mode::ModeId;

bitflags::bitflags! {
    /// Persistent mission/status flags. `START` is the only flag spec.md
    /// gives semantics to; the rest are reserved slots for future mission
    /// flags, matching spec.md §3's "room for future mission flags" — they
    /// are not read anywhere in this crate.
    #[derive(Default)]
    pub struct StatusFlags: u32 {
        /// First-boot complete; warm-restart path on next boot.
        const START = 1 << 0;
        /// Reserved for a future low-power mission flag.
        const LOW_POWER = 1 << 1;
        /// Reserved for a future safe-mode mission flag.
        const SAFE_MODE = 1 << 2;
    }
}

/// The `statusBits` field: persistent mission/status flags.
#[derive(Debug, Default)]
pub struct StatusBits(AtomicU32);

impl StatusBits {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Construct from a previously-saved snapshot value.
    pub const fn from_bits(bits: u32) -> Self {
        Self(AtomicU32::new(bits))
    }

    pub fn set(&self, flags: StatusFlags) {
        self.0.fetch_or(flags.bits(), Ordering::SeqCst);
    }

    pub fn clear(&self, flags: StatusFlags) {
        self.0.fetch_and(!flags.bits(), Ordering::SeqCst);
    }

    pub fn test(&self, flags: StatusFlags) -> bool {
        self.0.load(Ordering::SeqCst) & flags.bits() == flags.bits()
    }

    /// The raw value, for snapshotting.
    pub fn bits(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    /// Overwrite the whole field, e.g. when restoring a snapshot.
    pub fn restore(&self, bits: u32) {
        self.0.store(bits, Ordering::SeqCst);
    }
}

/// The `modeBits` field: one bit per [`ModeId`], set when that mode is
/// requested/pending.
///
/// [`ModeBits::setter`] hands out an append-only capability meant for the
/// arbiter (which runs on the tick thread and must never clear a bit out
/// from under the dispatcher); [`ModeBits::clear`] is the dispatcher's own
/// capability and lives on the full type.
#[derive(Debug, Default)]
pub struct ModeBits(AtomicU32);

impl ModeBits {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    pub fn bits(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn test(&self, mode: ModeId) -> bool {
        self.0.load(Ordering::SeqCst) & mode.bit() != 0
    }

    /// Clear exactly one mode's bit. Only ever called by the dispatcher,
    /// immediately after that mode's `run()` returns normally (spec.md
    /// §4.2's invariant).
    pub fn clear(&self, mode: ModeId) {
        self.0.fetch_and(!mode.bit(), Ordering::SeqCst);
    }

    /// An append-only handle suitable for handing to the arbiter: it can set
    /// bits but has no way to clear or overwrite the field.
    pub fn setter(&self) -> ModeBitsSetter<'_> {
        ModeBitsSetter(&self.0)
    }

    /// The highest-priority mode with its bit set, or `None` if every bit is
    /// clear.
    pub fn highest_priority_pending(&self) -> Option<ModeId> {
        let bits = self.bits();
        ModeId::ALL.into_iter().find(|m| bits & m.bit() != 0)
    }
}

/// An append-only capability over [`ModeBits`]: can only OR bits in.
#[derive(Clone, Copy)]
pub struct ModeBitsSetter<'a>(&'a AtomicU32);

impl ModeBitsSetter<'_> {
    pub fn set(&self, mode: ModeId) {
        self.0.fetch_or(mode.bit(), Ordering::SeqCst);
    }

    /// Read access is fine to expose on the setter-only handle; only
    /// `clear` (an AND) is withheld from the ISR side.
    pub fn bits(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn test(&self, mode: ModeId) -> bool {
        self.bits() & mode.bit() != 0
    }

    pub fn highest_priority_pending(&self) -> Option<ModeId> {
        let bits = self.bits();
        ModeId::ALL.into_iter().find(|m| bits & m.bit() != 0)
    }
}

/// The two-field status word described in spec.md §3.
#[derive(Debug, Default)]
pub struct StatusWord {
    pub status: StatusBits,
    pub mode: ModeBits,
}

impl StatusWord {
    pub const fn new() -> Self {
        Self {
            status: StatusBits::new(),
            mode: ModeBits::new(),
        }
    }
}
