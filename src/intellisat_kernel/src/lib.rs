//! The scheduling algorithms of the Intellisat flight executive: the
//! priority arbiter, the tick ISR body, the superloop, and startup.
//!
//! This crate plays the role `r3_kernel` plays for the R3 kernel: policy and
//! algorithms on top of the pure data types in `intellisat_core`, still with
//! no platform dependency (no threads, no real timers — those live in
//! `intellisat_sim`).
#![cfg_attr(not(feature = "std"), no_std)]

pub mod arbiter;
pub mod dispatcher;
pub mod scheduler;
pub mod startup;

pub use arbiter::systems_check;
pub use dispatcher::{mode_select, run_superloop, Executive, NeverStop, StopCondition};
pub use scheduler::{scheduler, PreemptionSignal};
pub use startup::{startup, ReleaseDelay};
