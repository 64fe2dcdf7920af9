//! Session controller
//!
//! Ties the session state machine to the hardware: button presses become
//! events, entering a state performs its side effects, and while running
//! every tick advances the sequencer once.

use crate::algorithm::{Algorithm, AlgorithmState, Fault};
use crate::combination::Combination;
use crate::config::{first_zone_from_digit, MachineConfig, Setting, SettingsStore};
use crate::control::Mechanism;
use crate::report::RunReport;
use crate::state::{Event, InputEvent, State};
use crate::traits::{LimitSwitch, ServoDriver, ServoError, StepperDriver};

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    Run,
    Calibrate,
}

impl MenuItem {
    fn toggle(self) -> Self {
        match self {
            MenuItem::Run => MenuItem::Calibrate,
            MenuItem::Calibrate => MenuItem::Run,
        }
    }
}

/// Owns the machine and everything a run needs
pub struct Controller<S, V, L, C> {
    config: MachineConfig,
    mechanism: Mechanism<S, V, L>,
    algorithm: Algorithm,
    settings: C,
    state: State,
    attempts: u32,
    started_at: Option<u32>,
    finished_at: Option<u32>,
    menu: MenuItem,
    zone_digit: u8,
}

impl<S, V, L, C> Controller<S, V, L, C>
where
    S: StepperDriver,
    V: ServoDriver,
    L: LimitSwitch,
    C: SettingsStore,
{
    /// Create a controller in the main menu
    pub fn new(mechanism: Mechanism<S, V, L>, settings: C, config: MachineConfig) -> Self {
        Self {
            algorithm: Algorithm::new(&config),
            config,
            mechanism,
            settings,
            state: State::Idle,
            attempts: 0,
            started_at: None,
            finished_at: None,
            menu: MenuItem::Run,
            zone_digit: 0,
        }
    }

    /// Bring the hardware to a known state after power-up
    ///
    /// A servo that cannot be parked leaves the controller on the fault page.
    pub fn boot(&mut self) {
        self.mechanism.stepper.reconfig();
        self.mechanism.stepper.disable();
        self.algorithm.init(&mut self.settings);
        if let Err(e) = self.mechanism.servo.init(&mut self.settings) {
            self.state = State::Fault(e.into());
        }
    }

    /// Handle a button press
    ///
    /// Returns the session event it produced, if any. Presses that only
    /// change a selection or nudge the servo produce none.
    pub fn process_input(&mut self, input: InputEvent, now_ms: u32) -> Option<Event> {
        let event = self.map_input(input)?;
        self.dispatch(event, now_ms);
        Some(event)
    }

    /// Advance the sequencer by one tick while running
    pub fn tick(&mut self, now_ms: u32) -> Option<Event> {
        if !self.state.is_running() {
            return None;
        }

        let event = match self
            .algorithm
            .run(&mut self.mechanism, now_ms, &mut self.attempts)
        {
            AlgorithmState::Running => return None,
            AlgorithmState::Complete => Event::Unlocked,
            AlgorithmState::Error(Fault::Exhausted) => Event::Exhausted,
            AlgorithmState::Error(fault) => Event::Faulted(fault),
        };
        self.dispatch(event, now_ms);
        Some(event)
    }

    /// Current session state
    pub fn state(&self) -> State {
        self.state
    }

    /// Combination being dialed
    pub fn combination(&self) -> Option<Combination> {
        self.algorithm.combination()
    }

    /// Pulls made since the run was set up
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Time since the run started, frozen once it ended
    pub fn elapsed_ms(&self, now_ms: u32) -> u32 {
        match self.started_at {
            Some(start) => self.finished_at.unwrap_or(now_ms).wrapping_sub(start),
            None => 0,
        }
    }

    /// Snapshot for the results page
    pub fn report(&self, now_ms: u32) -> RunReport {
        RunReport {
            combination: self.combination(),
            attempts: self.attempts,
            total: self.config.dial.legal_combinations(),
            elapsed_ms: self.elapsed_ms(now_ms),
        }
    }

    /// Highlighted main menu entry
    pub fn menu(&self) -> MenuItem {
        self.menu
    }

    /// Dial digit selected on the first-zone calibration page
    pub fn zone_digit(&self) -> u8 {
        self.zone_digit
    }

    /// Get access to the mechanism
    pub fn mechanism(&self) -> &Mechanism<S, V, L> {
        &self.mechanism
    }

    /// Get access to the sequencer
    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Get mutable access to the settings store
    ///
    /// Used to drain pending writes into flash.
    pub fn settings_mut(&mut self) -> &mut C {
        &mut self.settings
    }

    fn map_input(&mut self, input: InputEvent) -> Option<Event> {
        use InputEvent::*;

        match (self.state, input) {
            (State::Idle, Next | Previous) => {
                self.menu = self.menu.toggle();
                None
            }
            (State::Idle, Select) => Some(match self.menu {
                MenuItem::Run => Event::StartRun,
                MenuItem::Calibrate => Event::StartCalibration,
            }),

            (State::Preparing | State::Armed | State::CalibrationIntro, Select) => {
                Some(Event::Continue)
            }

            (State::Running, Back) => Some(Event::Abort),

            (state, Select | Back) if state.is_terminal() => Some(Event::Acknowledge),

            (State::CalibratingZone, Next) => {
                self.zone_digit = (self.zone_digit + 1) % self.config.dial.zone_offset;
                None
            }
            (State::CalibratingZone, Previous) => {
                let offset = self.config.dial.zone_offset;
                self.zone_digit = (self.zone_digit + offset - 1) % offset;
                None
            }
            (State::CalibratingZone, Select) => {
                // The digit never leaves the zone step, so this always maps
                let zone = first_zone_from_digit(&self.config.dial, self.zone_digit)?;
                self.settings.store(Setting::FirstZone, zone);
                Some(Event::ZoneSaved)
            }

            (State::CalibratingServo, Next) => {
                self.mechanism.servo.nudge_up().err().map(servo_fault)
            }
            (State::CalibratingServo, Previous) => {
                self.mechanism.servo.nudge_down().err().map(servo_fault)
            }
            (State::CalibratingServo, Select) => {
                let bottom = self.mechanism.servo.current_position();
                self.settings.store(Setting::ServoBottom, bottom);
                Some(Event::ServoSaved)
            }

            (_, Back) => Some(Event::Back),
            _ => None,
        }
    }

    fn dispatch(&mut self, event: Event, now_ms: u32) {
        let next = self.state.transition(event);
        if next != self.state {
            self.state = next;
            if let Err(fault) = self.enter(now_ms) {
                // Entering a fault page touches no hardware that can fail
                self.dispatch(Event::Faulted(fault), now_ms);
            }
        }
    }

    /// Side effects of entering the current state
    fn enter(&mut self, now_ms: u32) -> Result<(), Fault> {
        match self.state {
            State::Idle => self.mechanism.stepper.disable(),
            State::Preparing => {
                self.mechanism.servo.reconfig(&mut self.settings);
                self.mechanism.stepper.reconfig();
                self.algorithm.reconfig(&mut self.settings);
                self.attempts = 0;
                self.started_at = None;
                self.finished_at = None;
            }
            State::Armed => self.mechanism.servo.move_bottom()?,
            State::Running => {
                self.started_at = Some(now_ms);
                self.finished_at = None;
                self.mechanism.stepper.enable();
            }
            State::Unlocked | State::Exhausted | State::Fault(_) => {
                self.finished_at = Some(now_ms);
                self.mechanism.stepper.disable();
            }
            State::CalibrationIntro => {}
            State::CalibratingZone => {
                self.mechanism.servo.reconfig(&mut self.settings);
                self.zone_digit = 0;
                self.mechanism.servo.move_bottom()?;
            }
            State::CalibratingServo => {}
        }
        Ok(())
    }
}

fn servo_fault(e: ServoError) -> Event {
    Event::Faulted(e.into())
}
