//! Events that trigger state transitions

use crate::algorithm::Fault;

/// Button presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    Next,
    Previous,
    Select,
    Back,
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Menu events
    /// Operator chose to crack a lock
    StartRun,
    /// Operator chose to calibrate
    StartCalibration,
    /// Operator confirmed the current page
    Continue,
    /// Operator wants to go back
    Back,
    /// Operator stopped a run
    Abort,
    /// Operator dismissed a results page
    Acknowledge,

    // Sequencer events
    /// The limit switch reported the shackle open
    Unlocked,
    /// Every combination was tried
    Exhausted,
    /// The sequencer stopped on a fault
    Faulted(Fault),

    // Calibration events
    /// First zone stored
    ZoneSaved,
    /// Servo bottom stored
    ServoSaved,
}
