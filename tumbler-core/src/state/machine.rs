//! State machine definition

use super::events::Event;
use crate::algorithm::Fault;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Main menu
    Idle,
    /// Lock being attached; the puller may be anywhere
    Preparing,
    /// Puller at the bottom, waiting for the go
    Armed,
    /// Sequencer working through combinations
    Running,
    /// The lock opened
    Unlocked,
    /// Every combination failed
    Exhausted,
    /// The sequencer stopped on a fault
    Fault(Fault),
    /// Calibration instructions
    CalibrationIntro,
    /// Operator picking the first-zone digit
    CalibratingZone,
    /// Operator nudging the puller to its bottom
    CalibratingServo,
}

impl State {
    /// Check if the sequencer should be ticked
    pub fn is_running(&self) -> bool {
        matches!(self, State::Running)
    }

    /// Check if this is a results page
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Unlocked | State::Exhausted | State::Fault(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Main menu
            (Idle, StartRun) => Preparing,
            (Idle, StartCalibration) => CalibrationIntro,

            // Run setup
            (Preparing, Continue) => Armed,
            (Preparing, Back) => Idle,
            (Armed, Continue) => Running,
            (Armed, Back) => Preparing,

            // Running
            (Running, Event::Unlocked) => State::Unlocked,
            (Running, Event::Exhausted) => State::Exhausted,
            (Running, Abort) => Idle,

            // Hardware faults end whatever page is showing
            (state, Faulted(kind)) if !state.is_terminal() => State::Fault(kind),

            // Results
            (State::Unlocked | State::Exhausted | State::Fault(_), Acknowledge) => Idle,

            // Calibration
            (CalibrationIntro, Continue) => CalibratingZone,
            (CalibrationIntro, Back) => Idle,
            (CalibratingZone, ZoneSaved) => CalibratingServo,
            (CalibratingZone, Back) => CalibrationIntro,
            (CalibratingServo, ServoSaved) => Idle,
            (CalibratingServo, Back) => CalibratingZone,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_flow() {
        let state = State::Idle.transition(Event::StartRun);
        assert_eq!(state, State::Preparing);

        let state = state.transition(Event::Continue);
        assert_eq!(state, State::Armed);

        let state = state.transition(Event::Continue);
        assert_eq!(state, State::Running);
        assert!(state.is_running());

        let state = state.transition(Event::Unlocked);
        assert_eq!(state, State::Unlocked);
        assert!(state.is_terminal());

        assert_eq!(state.transition(Event::Acknowledge), State::Idle);
    }

    #[test]
    fn test_back_navigation() {
        assert_eq!(State::Preparing.transition(Event::Back), State::Idle);
        assert_eq!(State::Armed.transition(Event::Back), State::Preparing);
        assert_eq!(State::CalibrationIntro.transition(Event::Back), State::Idle);
        assert_eq!(
            State::CalibratingZone.transition(Event::Back),
            State::CalibrationIntro
        );
        assert_eq!(
            State::CalibratingServo.transition(Event::Back),
            State::CalibratingZone
        );
    }

    #[test]
    fn test_run_outcomes() {
        assert_eq!(State::Running.transition(Event::Exhausted), State::Exhausted);
        assert_eq!(
            State::Running.transition(Event::Faulted(Fault::CommandConflict)),
            State::Fault(Fault::CommandConflict)
        );
        assert_eq!(State::Running.transition(Event::Abort), State::Idle);
    }

    #[test]
    fn test_results_need_acknowledge() {
        let states = [
            State::Unlocked,
            State::Exhausted,
            State::Fault(Fault::CommandConflict),
        ];

        for state in states {
            assert_eq!(state.transition(Event::Back), state);
            assert_eq!(state.transition(Event::Acknowledge), State::Idle);
        }
    }

    #[test]
    fn test_calibration_flow() {
        let state = State::Idle.transition(Event::StartCalibration);
        assert_eq!(state, State::CalibrationIntro);

        let state = state.transition(Event::Continue);
        let state = state.transition(Event::ZoneSaved);
        assert_eq!(state, State::CalibratingServo);

        assert_eq!(state.transition(Event::ServoSaved), State::Idle);
    }

    #[test]
    fn test_servo_fault_from_any_page() {
        let fault = Event::Faulted(Fault::Servo);
        assert_eq!(State::Idle.transition(fault), State::Fault(Fault::Servo));
        assert_eq!(State::Armed.transition(fault), State::Fault(Fault::Servo));
        assert_eq!(
            State::CalibratingServo.transition(fault),
            State::Fault(Fault::Servo)
        );

        // A results page keeps the first outcome
        assert_eq!(State::Unlocked.transition(fault), State::Unlocked);
    }

    #[test]
    fn test_outcomes_ignored_outside_running() {
        assert_eq!(State::Idle.transition(Event::Unlocked), State::Idle);
        assert_eq!(State::Armed.transition(Event::Exhausted), State::Armed);
        assert_eq!(State::Preparing.transition(Event::Abort), State::Preparing);
    }
}
