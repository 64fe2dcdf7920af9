//! Attempt sequencer
//!
//! One attempt dials a combination and pulls the shackle:
//!
//! ```text
//! Enumerate -> [ResetDial -> DialFirst -> UnwindDial -> DialSecond] -> DialThird
//!           -> Lift -> Lower -> Enumerate
//! ```
//!
//! The bracketed part only runs when the new combination changed the first
//! or second digit; otherwise only the third wheel has to move. Every call
//! to [`Algorithm::run`] does at most one step of stepper work, so the
//! caller can keep polling inputs between ticks.

use crate::combination::{advance, Advance, Combination};
use crate::config::{load_first_zone, DialGeometry, MachineConfig, SettingsStore};
use crate::control::{Mechanism, Progress, StepperError};
use crate::traits::{LimitSwitch, ServoDriver, ServoError, StepperDriver};

use super::timer::DwellTimer;

/// Whether a dwell phase is being entered or resumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    Enter,
    Resume,
}

/// Sequencer phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Pick the next combination
    Enumerate,
    /// Two clockwise turns to pick up every wheel
    ResetDial,
    /// Clockwise to the first digit
    DialFirst,
    /// One counter-clockwise turn to pass the first wheel
    UnwindDial,
    /// Counter-clockwise to the second digit
    DialSecond,
    /// Clockwise to the third digit
    DialThird,
    /// Puller at the top, watching the limit switch
    Lift(Stage),
    /// Puller returning to the bottom
    Lower(Stage),
    /// Shackle opened; latched until reconfigured
    Opened,
}

/// Reasons the sequencer stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Every legal combination has been tried
    Exhausted,
    /// A stepper command was issued while another was in flight
    CommandConflict,
    /// The puller servo did not accept a move
    Servo,
}

impl From<ServoError> for Fault {
    fn from(_: ServoError) -> Self {
        Fault::Servo
    }
}

/// Outcome of one sequencer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlgorithmState {
    /// Still working; call again next tick
    Running,
    /// Stopped without opening the lock
    Error(Fault),
    /// The limit switch reported the shackle open
    Complete,
}

/// The attempt sequencer
///
/// Owns the canonical combination and both dwell timers.
#[derive(Debug, Clone)]
pub struct Algorithm {
    dial: DialGeometry,
    phase: Phase,
    combination: Option<Combination>,
    first_zone: u8,
    lift_timer: DwellTimer,
    lower_timer: DwellTimer,
}

impl Algorithm {
    /// Create a sequencer with no combination assigned
    pub fn new(config: &MachineConfig) -> Self {
        Self {
            dial: config.dial,
            phase: Phase::Enumerate,
            combination: None,
            first_zone: crate::config::DEFAULT_FIRST_ZONE,
            lift_timer: DwellTimer::new(config.dwell.lift_ms),
            lower_timer: DwellTimer::new(config.dwell.lower_ms),
        }
    }

    /// Load persisted settings and reset to the start of the enumeration
    pub fn init<S: SettingsStore>(&mut self, settings: &mut S) {
        self.reconfig(settings);
    }

    /// Reset for a new run without rebooting
    ///
    /// Reloads the first zone, forgets the combination and cancels both
    /// dwell timers.
    pub fn reconfig<S: SettingsStore>(&mut self, settings: &mut S) {
        self.first_zone = load_first_zone(settings, &self.dial);
        self.combination = None;
        self.lift_timer.stop();
        self.lower_timer.stop();
        self.phase = Phase::Enumerate;
    }

    /// Combination being dialed, `None` before the first attempt
    pub fn combination(&self) -> Option<Combination> {
        self.combination
    }

    /// First zone the enumeration is based on
    pub fn first_zone(&self) -> u8 {
        self.first_zone
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Check if either dwell timer is armed
    pub fn is_dwelling(&self) -> bool {
        self.lift_timer.is_running() || self.lower_timer.is_running()
    }

    /// Advance the sequencer by one tick
    ///
    /// `attempts` is incremented each time the puller is raised.
    pub fn run<S, V, L>(
        &mut self,
        mech: &mut Mechanism<S, V, L>,
        now_ms: u32,
        attempts: &mut u32,
    ) -> AlgorithmState
    where
        S: StepperDriver,
        V: ServoDriver,
        L: LimitSwitch,
    {
        match self.phase {
            Phase::Enumerate => self.enumerate(),

            Phase::ResetDial => {
                let result = mech.stepper.reset_dial();
                self.advance_on(result, Phase::DialFirst)
            }

            Phase::DialFirst => {
                let Some(combo) = self.combination else {
                    return self.restart();
                };
                let result = mech.stepper.dial_first(combo.first);
                self.advance_on(result, Phase::UnwindDial)
            }

            Phase::UnwindDial => {
                let result = mech.stepper.unwind_dial();
                self.advance_on(result, Phase::DialSecond)
            }

            Phase::DialSecond => {
                let Some(combo) = self.combination else {
                    return self.restart();
                };
                let result = mech.stepper.dial_second(combo.second);
                self.advance_on(result, Phase::DialThird)
            }

            Phase::DialThird => {
                let Some(combo) = self.combination else {
                    return self.restart();
                };
                let result = mech.stepper.dial_third(combo.third);
                self.advance_on(result, Phase::Lift(Stage::Enter))
            }

            Phase::Lift(stage) => {
                if stage == Stage::Enter {
                    if let Err(e) = mech.servo.move_top() {
                        return AlgorithmState::Error(e.into());
                    }
                    *attempts += 1;
                    self.lift_timer.start(now_ms);
                    self.phase = Phase::Lift(Stage::Resume);
                }

                // The switch wins over the timer
                if mech.limit_switch.is_activated() {
                    self.lift_timer.stop();
                    self.phase = Phase::Opened;
                    return AlgorithmState::Complete;
                }

                if self.lift_timer.poll(now_ms) {
                    self.lift_timer.stop();
                    self.phase = Phase::Lower(Stage::Enter);
                }
                AlgorithmState::Running
            }

            Phase::Lower(stage) => {
                if stage == Stage::Enter {
                    if let Err(e) = mech.servo.move_bottom() {
                        return AlgorithmState::Error(e.into());
                    }
                    self.lower_timer.start(now_ms);
                    self.phase = Phase::Lower(Stage::Resume);
                }

                if self.lower_timer.poll(now_ms) {
                    self.lower_timer.stop();
                    self.phase = Phase::Enumerate;
                }
                AlgorithmState::Running
            }

            Phase::Opened => AlgorithmState::Complete,
        }
    }

    fn enumerate(&mut self) -> AlgorithmState {
        let first_zone = self.first_zone;
        if advance(&mut self.combination, &self.dial, first_zone) == Advance::Exhausted {
            return AlgorithmState::Error(Fault::Exhausted);
        }

        self.phase = match self.combination {
            Some(combo) if self.needs_reset(&combo) => Phase::ResetDial,
            _ => Phase::DialThird,
        };
        AlgorithmState::Running
    }

    /// Check whether the new combination moved the first or second wheel
    ///
    /// The third digit wraps to the first zone whenever a carry happened;
    /// the second clause catches carries whose wrapped third was skipped
    /// for repeating the second digit.
    fn needs_reset(&self, combo: &Combination) -> bool {
        let fz = self.first_zone;
        combo.third == fz || (combo.second == fz && combo.third == fz + self.dial.zone_offset)
    }

    fn advance_on(&mut self, result: Result<Progress, StepperError>, next: Phase) -> AlgorithmState {
        match result {
            Ok(Progress::Complete) => {
                self.phase = next;
                AlgorithmState::Running
            }
            Ok(Progress::Incomplete) => AlgorithmState::Running,
            Err(StepperError::CommandConflict { .. }) => {
                AlgorithmState::Error(Fault::CommandConflict)
            }
        }
    }

    fn restart(&mut self) -> AlgorithmState {
        self.phase = Phase::Enumerate;
        AlgorithmState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServoLimits, Setting, SettingsCache};
    use crate::control::fakes::{FakeServo, FakeStepper, FakeSwitch};
    use crate::control::ServoControl;

    type TestMechanism = Mechanism<FakeStepper, FakeServo, FakeSwitch>;

    fn setup() -> (Algorithm, TestMechanism, SettingsCache) {
        let config = MachineConfig::default();
        let mut settings = SettingsCache::new();
        settings.preload(Setting::FirstZone, 2);
        settings.preload(Setting::ServoBottom, 140);

        let mut algorithm = Algorithm::new(&config);
        algorithm.init(&mut settings);
        let mech = Mechanism::new(
            FakeStepper::default(),
            FakeServo::default(),
            FakeSwitch::default(),
            &config,
        );
        (algorithm, mech, settings)
    }

    /// Run until the phase changes, returning the number of ticks
    fn run_phase(
        algorithm: &mut Algorithm,
        mech: &mut TestMechanism,
        now: &mut u32,
        attempts: &mut u32,
    ) -> u32 {
        let start = algorithm.phase();
        let mut ticks = 0;
        while algorithm.phase() == start {
            assert_eq!(algorithm.run(mech, *now, attempts), AlgorithmState::Running);
            *now += 1;
            ticks += 1;
            assert!(ticks < 10_000, "stuck in {:?}", start);
        }
        ticks
    }

    #[test]
    fn test_init_loads_first_zone() {
        let config = MachineConfig::default();
        let mut settings = SettingsCache::new();
        settings.preload(Setting::FirstZone, 5);

        let mut algorithm = Algorithm::new(&config);
        algorithm.init(&mut settings);
        assert_eq!(algorithm.first_zone(), 5);
        assert_eq!(algorithm.combination(), None);
        assert_eq!(algorithm.phase(), Phase::Enumerate);
    }

    #[test]
    fn test_full_attempt_sequence() {
        let (mut algorithm, mut mech, _) = setup();
        let mut now = 0;
        let mut attempts = 0;

        run_phase(&mut algorithm, &mut mech, &mut now, &mut attempts);
        assert_eq!(algorithm.combination(), Some(Combination::new(2, 8, 2)));
        assert_eq!(algorithm.phase(), Phase::ResetDial);

        let expected = [
            Phase::DialFirst,
            Phase::UnwindDial,
            Phase::DialSecond,
            Phase::DialThird,
            Phase::Lift(Stage::Enter),
        ];
        for phase in expected {
            run_phase(&mut algorithm, &mut mech, &mut now, &mut attempts);
            assert_eq!(algorithm.phase(), phase);
        }
        assert_eq!(mech.stepper.current_step(), 6);
        assert_eq!(attempts, 0);

        run_phase(&mut algorithm, &mut mech, &mut now, &mut attempts);
        assert_eq!(attempts, 1);
        assert_eq!(mech.servo.driver().angles, vec![100]);

        // Lift dwell then lower dwell
        let lift = run_phase(&mut algorithm, &mut mech, &mut now, &mut attempts);
        assert_eq!(lift, 500);
        assert_eq!(algorithm.phase(), Phase::Lower(Stage::Enter));

        run_phase(&mut algorithm, &mut mech, &mut now, &mut attempts);
        let lower = run_phase(&mut algorithm, &mut mech, &mut now, &mut attempts);
        assert_eq!(lower, 300);
        assert_eq!(algorithm.phase(), Phase::Enumerate);
        assert_eq!(mech.servo.driver().angles, vec![100, 140]);
        assert!(!algorithm.is_dwelling());
    }

    #[test]
    fn test_third_only_attempt_skips_reset() {
        let (mut algorithm, mut mech, _) = setup();
        let mut now = 0;
        let mut attempts = 0;

        // Finish the first attempt
        while !(algorithm.phase() == Phase::Enumerate && attempts == 1) {
            algorithm.run(&mut mech, now, &mut attempts);
            now += 1;
        }

        run_phase(&mut algorithm, &mut mech, &mut now, &mut attempts);
        assert_eq!(algorithm.combination(), Some(Combination::new(2, 8, 14)));
        assert_eq!(algorithm.phase(), Phase::DialThird);
    }

    #[test]
    fn test_second_clause_routes_to_reset() {
        let (mut algorithm, _, _) = setup();
        // (8,56,56) is illegal, the carry lands on (14,2,2), also illegal,
        // so the next legal triple is (14,2,8)
        algorithm.combination = Some(Combination::new(8, 56, 50));
        algorithm.enumerate();

        assert_eq!(algorithm.combination(), Some(Combination::new(14, 2, 8)));
        assert_eq!(algorithm.phase(), Phase::ResetDial);
    }

    #[test]
    fn test_switch_checked_on_entry() {
        let (mut algorithm, mut mech, _) = setup();
        algorithm.combination = Some(Combination::new(2, 8, 2));
        algorithm.phase = Phase::Lift(Stage::Enter);
        mech.limit_switch.activated = true;

        let mut attempts = 0;
        assert_eq!(algorithm.run(&mut mech, 0, &mut attempts), AlgorithmState::Complete);
        assert_eq!(attempts, 1);
        assert!(!algorithm.is_dwelling());

        // Latched until reconfigured
        assert_eq!(algorithm.run(&mut mech, 1, &mut attempts), AlgorithmState::Complete);
        assert_eq!(attempts, 1);
    }

    #[test]
    fn test_conflict_reported_as_fault() {
        let (mut algorithm, mut mech, _) = setup();
        algorithm.combination = Some(Combination::new(2, 8, 2));
        mech.stepper.unwind_dial().unwrap();
        algorithm.phase = Phase::DialFirst;

        let mut attempts = 0;
        assert_eq!(
            algorithm.run(&mut mech, 0, &mut attempts),
            AlgorithmState::Error(Fault::CommandConflict)
        );
        assert_eq!(algorithm.phase(), Phase::DialFirst);
    }

    #[test]
    fn test_servo_failure_stops_the_attempt() {
        let (mut algorithm, mut mech, _) = setup();
        algorithm.combination = Some(Combination::new(2, 8, 2));
        algorithm.phase = Phase::Lift(Stage::Enter);
        mech.servo = ServoControl::new(
            FakeServo {
                fail: true,
                ..FakeServo::default()
            },
            ServoLimits::default(),
        );

        let mut attempts = 0;
        assert_eq!(
            algorithm.run(&mut mech, 0, &mut attempts),
            AlgorithmState::Error(Fault::Servo)
        );
        assert_eq!(attempts, 0);
        assert!(!algorithm.is_dwelling());

        algorithm.phase = Phase::Lower(Stage::Enter);
        assert_eq!(
            algorithm.run(&mut mech, 1, &mut attempts),
            AlgorithmState::Error(Fault::Servo)
        );
        assert!(!algorithm.is_dwelling());
    }

    #[test]
    fn test_reconfig_resets_everything() {
        let (mut algorithm, mut mech, mut settings) = setup();
        algorithm.combination = Some(Combination::new(2, 8, 2));
        algorithm.phase = Phase::Lift(Stage::Enter);
        let mut attempts = 0;
        algorithm.run(&mut mech, 0, &mut attempts);
        assert!(algorithm.is_dwelling());

        settings.preload(Setting::FirstZone, 3);
        algorithm.reconfig(&mut settings);
        assert!(!algorithm.is_dwelling());
        assert_eq!(algorithm.combination(), None);
        assert_eq!(algorithm.first_zone(), 3);
        assert_eq!(algorithm.phase(), Phase::Enumerate);
    }
}
