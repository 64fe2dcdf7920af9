//! Non-blocking dial stepper control
//!
//! Every command moves the dial by at most one step per call and reports
//! whether it has finished. The caller keeps calling the same command once
//! per tick until it reports [`Progress::Complete`]. Only one command may be
//! in flight: asking for a different one before the active command finishes
//! is rejected with [`StepperError::CommandConflict`] and changes nothing.
//!
//! Absolute moves always turn in the direction the lock requires for that
//! digit, never the shortest way round, because the lock's wheel pack only
//! picks up the next wheel when the dial keeps turning one way.

use crate::config::DialGeometry;
use crate::traits::{Direction, StepperDriver};

/// Stepper commands issued by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepperCommand {
    /// Clockwise to the first digit
    DialFirst,
    /// Counter-clockwise to the second digit
    DialSecond,
    /// Clockwise to the third digit
    DialThird,
    /// Two full clockwise turns to clear the wheel pack
    ResetDial,
    /// One full counter-clockwise turn before the second digit
    UnwindDial,
}

impl StepperCommand {
    /// Direction this command turns the dial
    pub fn direction(self) -> Direction {
        match self {
            StepperCommand::DialFirst | StepperCommand::DialThird | StepperCommand::ResetDial => {
                Direction::Clockwise
            }
            StepperCommand::DialSecond | StepperCommand::UnwindDial => Direction::CounterClockwise,
        }
    }

    /// Full turns made by a relative rotation, `None` for absolute moves
    pub fn turns(self) -> Option<u32> {
        match self {
            StepperCommand::ResetDial => Some(2),
            StepperCommand::UnwindDial => Some(1),
            _ => None,
        }
    }
}

/// Outcome of one call to a stepper command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// The command moved and must be called again
    Incomplete,
    /// The command has finished; the stepper is free
    Complete,
}

/// Errors that can occur with stepper commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepperError {
    /// Another command is still in flight
    CommandConflict {
        active: StepperCommand,
        requested: StepperCommand,
    },
}

/// In-flight command state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Motion {
    Idle,
    Dialing(StepperCommand),
    Rotating {
        command: StepperCommand,
        stepped: u32,
        target: u32,
    },
}

impl Motion {
    fn command(&self) -> Option<StepperCommand> {
        match *self {
            Motion::Idle => None,
            Motion::Dialing(command) | Motion::Rotating { command, .. } => Some(command),
        }
    }
}

/// Dial stepper controller
///
/// Owns the absolute step counter; the counter is open loop and only
/// meaningful relative to where the dial was when the machine was set up.
pub struct StepperControl<S> {
    driver: S,
    dial: DialGeometry,
    motion: Motion,
    current_step: u16,
}

impl<S: StepperDriver> StepperControl<S> {
    /// Create a new stepper controller
    pub fn new(driver: S, dial: DialGeometry) -> Self {
        Self {
            driver,
            dial,
            motion: Motion::Idle,
            current_step: 0,
        }
    }

    /// Forget any in-flight command and zero the step counter
    pub fn reconfig(&mut self) {
        self.motion = Motion::Idle;
        self.current_step = 0;
        self.driver.set_direction(Direction::Clockwise);
    }

    /// Current absolute step index, in `0..steps_per_rev`
    pub fn current_step(&self) -> u16 {
        self.current_step
    }

    /// Command currently in flight, if any
    pub fn active_command(&self) -> Option<StepperCommand> {
        self.motion.command()
    }

    /// Get access to the underlying driver
    pub fn driver(&self) -> &S {
        &self.driver
    }

    /// Turn clockwise until the first digit is under the mark
    pub fn dial_first(&mut self, position: u8) -> Result<Progress, StepperError> {
        self.dial_to(StepperCommand::DialFirst, position)
    }

    /// Turn counter-clockwise until the second digit is under the mark
    pub fn dial_second(&mut self, position: u8) -> Result<Progress, StepperError> {
        self.dial_to(StepperCommand::DialSecond, position)
    }

    /// Turn clockwise until the third digit is under the mark
    pub fn dial_third(&mut self, position: u8) -> Result<Progress, StepperError> {
        self.dial_to(StepperCommand::DialThird, position)
    }

    /// Turn clockwise two full revolutions
    pub fn reset_dial(&mut self) -> Result<Progress, StepperError> {
        self.rotate(StepperCommand::ResetDial)
    }

    /// Turn counter-clockwise one full revolution
    pub fn unwind_dial(&mut self) -> Result<Progress, StepperError> {
        self.rotate(StepperCommand::UnwindDial)
    }

    /// Energize the motor so it holds the dial
    pub fn enable(&mut self) {
        self.driver.enable(true);
    }

    /// Release the motor so the dial can be turned by hand
    pub fn disable(&mut self) {
        self.driver.enable(false);
    }

    /// Check if the motor is energized
    pub fn is_enabled(&self) -> bool {
        self.driver.is_enabled()
    }

    fn claim(&self, requested: StepperCommand) -> Result<(), StepperError> {
        match self.motion.command() {
            Some(active) if active != requested => {
                Err(StepperError::CommandConflict { active, requested })
            }
            _ => Ok(()),
        }
    }

    fn dial_to(&mut self, command: StepperCommand, position: u8) -> Result<Progress, StepperError> {
        self.claim(command)?;

        let target = self.dial.position_to_step(position) % self.dial.steps_per_rev;
        if target != self.current_step {
            self.step(command.direction());
            self.motion = Motion::Dialing(command);
            Ok(Progress::Incomplete)
        } else {
            self.motion = Motion::Idle;
            Ok(Progress::Complete)
        }
    }

    fn rotate(&mut self, command: StepperCommand) -> Result<Progress, StepperError> {
        self.claim(command)?;

        let (stepped, target) = match self.motion {
            Motion::Rotating {
                stepped, target, ..
            } => (stepped, target),
            _ => {
                let turns = command.turns().unwrap_or(1);
                (0, turns * self.dial.steps_per_rev as u32)
            }
        };

        self.step(command.direction());
        let stepped = stepped + 1;

        if stepped < target {
            self.motion = Motion::Rotating {
                command,
                stepped,
                target,
            };
            Ok(Progress::Incomplete)
        } else {
            self.motion = Motion::Idle;
            Ok(Progress::Complete)
        }
    }

    /// Move one step and track the new position
    fn step(&mut self, dir: Direction) {
        self.driver.set_direction(dir);
        self.driver.step();

        let steps = self.dial.steps_per_rev;
        self.current_step = match dir {
            Direction::Clockwise => (self.current_step + 1) % steps,
            Direction::CounterClockwise => (self.current_step + steps - 1) % steps,
        };
    }
}
