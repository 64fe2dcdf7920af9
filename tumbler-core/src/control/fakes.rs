//! Recording drivers for unit tests

use crate::traits::{Direction, LimitSwitch, ServoDriver, ServoError, StepperDriver, SwitchState};

#[derive(Debug, Clone, Default)]
pub struct FakeStepper {
    pub direction: Option<Direction>,
    pub steps: u32,
    pub clockwise_steps: u32,
    pub counter_clockwise_steps: u32,
    pub enabled: bool,
}

impl StepperDriver for FakeStepper {
    fn set_direction(&mut self, dir: Direction) {
        self.direction = Some(dir);
    }

    fn step(&mut self) {
        self.steps += 1;
        match self.direction {
            Some(Direction::CounterClockwise) => self.counter_clockwise_steps += 1,
            _ => self.clockwise_steps += 1,
        }
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeServo {
    pub angles: Vec<u8>,
    pub fail: bool,
}

impl ServoDriver for FakeServo {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ServoError> {
        if self.fail {
            return Err(ServoError::Output);
        }
        self.angles.push(degrees);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeSwitch {
    pub activated: bool,
}

impl LimitSwitch for FakeSwitch {
    fn state(&mut self) -> SwitchState {
        if self.activated {
            SwitchState::Activated
        } else {
            SwitchState::Released
        }
    }
}
