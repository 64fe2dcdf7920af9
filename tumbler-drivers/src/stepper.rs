//! Step/direction stepper driver
//!
//! Drives any stepper driver board with STEP, DIR and EN inputs. Each step
//! is a blocking high/low pulse; the delays double as settling time for the
//! motor, which limits the dial to a few hundred steps per second.
//!
//! Pins must be infallible (`Error = Infallible`), which holds for on-chip
//! GPIO on the supported boards.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use tumbler_core::traits::{Direction, StepperDriver};

/// Step/direction driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepDirConfig {
    /// EN is active low (true for EasyDriver and A4988 boards)
    pub enable_inverted: bool,
    /// Swap the DIR level for clockwise
    pub dir_inverted: bool,
    /// Time STEP is held high (us)
    pub pulse_high_us: u32,
    /// Time STEP is held low after the pulse (us)
    pub pulse_low_us: u32,
}

impl Default for StepDirConfig {
    fn default() -> Self {
        Self {
            enable_inverted: true,
            dir_inverted: false,
            pulse_high_us: 1_000,
            pulse_low_us: 1_000,
        }
    }
}

/// Stepper driven through STEP/DIR/EN GPIO lines
pub struct StepDirStepper<STEP, DIR, EN, D> {
    step_pin: STEP,
    dir_pin: DIR,
    enable_pin: EN,
    delay: D,
    config: StepDirConfig,
    enabled: bool,
}

impl<STEP, DIR, EN, D> StepDirStepper<STEP, DIR, EN, D>
where
    STEP: OutputPin<Error = Infallible>,
    DIR: OutputPin<Error = Infallible>,
    EN: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    /// Create a new driver, initially disabled and set clockwise
    pub fn new(step_pin: STEP, dir_pin: DIR, enable_pin: EN, delay: D, config: StepDirConfig) -> Self {
        let mut stepper = Self {
            step_pin,
            dir_pin,
            enable_pin,
            delay,
            config,
            enabled: false,
        };
        drive(&mut stepper.step_pin, false);
        stepper.set_direction(Direction::Clockwise);
        stepper.enable(false);
        stepper
    }
}

impl<STEP, DIR, EN, D> StepperDriver for StepDirStepper<STEP, DIR, EN, D>
where
    STEP: OutputPin<Error = Infallible>,
    DIR: OutputPin<Error = Infallible>,
    EN: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    fn set_direction(&mut self, dir: Direction) {
        let clockwise = dir == Direction::Clockwise;
        // Clockwise is DIR low unless inverted
        drive(&mut self.dir_pin, clockwise == self.config.dir_inverted);
    }

    fn step(&mut self) {
        drive(&mut self.step_pin, true);
        self.delay.delay_us(self.config.pulse_high_us);
        drive(&mut self.step_pin, false);
        self.delay.delay_us(self.config.pulse_low_us);
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
        drive(&mut self.enable_pin, enabled != self.config.enable_inverted);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, high: bool) {
    let _ = pin.set_state(PinState::from(high));
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use embedded_hal::digital::ErrorType;

    use super::*;

    type Log = Rc<RefCell<Vec<(&'static str, bool)>>>;

    struct FakePin {
        name: &'static str,
        log: Log,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push((self.name, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push((self.name, true));
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct FakeDelay {
        total_ns: Rc<RefCell<u64>>,
    }

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            *self.total_ns.borrow_mut() += ns as u64;
        }
    }

    fn stepper(
        config: StepDirConfig,
    ) -> (StepDirStepper<FakePin, FakePin, FakePin, FakeDelay>, Log, FakeDelay) {
        let log: Log = Rc::default();
        let pin = |name| FakePin {
            name,
            log: log.clone(),
        };
        let delay = FakeDelay::default();
        let stepper = StepDirStepper::new(pin("step"), pin("dir"), pin("en"), delay.clone(), config);
        (stepper, log, delay)
    }

    #[test]
    fn test_starts_disabled_and_clockwise() {
        let (stepper, log, _) = stepper(StepDirConfig::default());
        assert!(!stepper.is_enabled());
        assert_eq!(
            *log.borrow(),
            vec![("step", false), ("dir", false), ("en", true)]
        );
    }

    #[test]
    fn test_enable_is_active_low() {
        let (mut stepper, log, _) = stepper(StepDirConfig::default());
        log.borrow_mut().clear();

        stepper.enable(true);
        assert!(stepper.is_enabled());
        stepper.enable(false);
        assert_eq!(*log.borrow(), vec![("en", false), ("en", true)]);
    }

    #[test]
    fn test_active_high_enable() {
        let config = StepDirConfig {
            enable_inverted: false,
            ..Default::default()
        };
        let (mut stepper, log, _) = stepper(config);
        log.borrow_mut().clear();

        stepper.enable(true);
        assert_eq!(*log.borrow(), vec![("en", true)]);
    }

    #[test]
    fn test_direction_levels() {
        let (mut stepper, log, _) = stepper(StepDirConfig::default());
        log.borrow_mut().clear();

        stepper.set_direction(Direction::CounterClockwise);
        stepper.set_direction(Direction::Clockwise);
        assert_eq!(*log.borrow(), vec![("dir", true), ("dir", false)]);
    }

    #[test]
    fn test_inverted_direction() {
        let config = StepDirConfig {
            dir_inverted: true,
            ..Default::default()
        };
        let (mut stepper, log, _) = stepper(config);
        log.borrow_mut().clear();

        stepper.set_direction(Direction::Clockwise);
        assert_eq!(*log.borrow(), vec![("dir", true)]);
    }

    #[test]
    fn test_step_pulse_timing() {
        let (mut stepper, log, delay) = stepper(StepDirConfig::default());
        log.borrow_mut().clear();

        stepper.step();
        assert_eq!(*log.borrow(), vec![("step", true), ("step", false)]);
        // 1 ms high + 1 ms low
        assert_eq!(*delay.total_ns.borrow(), 2_000_000);
    }
}
