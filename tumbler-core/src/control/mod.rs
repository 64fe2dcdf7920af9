//! Actuator control
//!
//! Wraps the raw drivers with the bookkeeping the sequencer needs: absolute
//! dial position and single-step commands for the stepper, calibrated
//! endpoints for the servo.

pub mod servo;
pub mod stepper;

#[cfg(test)]
pub(crate) mod fakes;

pub use servo::ServoControl;
pub use stepper::{Progress, StepperCommand, StepperControl, StepperError};

use crate::config::MachineConfig;
use crate::traits::{LimitSwitch, ServoDriver, StepperDriver};

/// Everything the sequencer drives or reads
pub struct Mechanism<S, V, L> {
    pub stepper: StepperControl<S>,
    pub servo: ServoControl<V>,
    pub limit_switch: L,
}

impl<S, V, L> Mechanism<S, V, L>
where
    S: StepperDriver,
    V: ServoDriver,
    L: LimitSwitch,
{
    /// Assemble a mechanism from its drivers
    pub fn new(stepper: S, servo: V, limit_switch: L, config: &MachineConfig) -> Self {
        Self {
            stepper: StepperControl::new(stepper, config.dial),
            servo: ServoControl::new(servo, config.servo),
            limit_switch,
        }
    }
}
