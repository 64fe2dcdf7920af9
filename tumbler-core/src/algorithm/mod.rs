//! Combination cracking sequencer
//!
//! Drives the stepper through each combination, lifts the puller and
//! watches the limit switch, one bounded tick at a time.

pub mod machine;
pub mod timer;

pub use machine::{Algorithm, AlgorithmState, Fault, Phase, Stage};
pub use timer::DwellTimer;
