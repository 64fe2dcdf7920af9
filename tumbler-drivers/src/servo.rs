//! PWM hobby servo driver
//!
//! Maps an angle in degrees onto a pulse width inside a fixed PWM period
//! (20 ms for standard servos). The PWM channel must already run at the
//! servo frame rate; only the duty cycle is changed here.

use embedded_hal::pwm::SetDutyCycle;
use tumbler_core::traits::{ServoDriver, ServoError};

/// Maximum servo angle in degrees
pub const MAX_ANGLE: u8 = 180;

/// Servo pulse timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoTiming {
    /// PWM period (us)
    pub period_us: u16,
    /// Pulse width at 0 degrees (us)
    pub min_pulse_us: u16,
    /// Pulse width at 180 degrees (us)
    pub max_pulse_us: u16,
}

impl Default for ServoTiming {
    fn default() -> Self {
        Self {
            period_us: 20_000,
            min_pulse_us: 500,
            max_pulse_us: 2_500,
        }
    }
}

impl ServoTiming {
    /// Pulse width for an angle, saturating at 180 degrees
    pub fn pulse_us(&self, degrees: u8) -> u16 {
        let degrees = degrees.min(MAX_ANGLE) as u32;
        let span = self.max_pulse_us.saturating_sub(self.min_pulse_us) as u32;
        self.min_pulse_us + (span * degrees / MAX_ANGLE as u32) as u16
    }
}

/// Servo on a PWM channel
pub struct PwmServo<P> {
    pwm: P,
    timing: ServoTiming,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Create a new servo driver
    ///
    /// The output is left untouched until the first angle is written.
    pub fn new(pwm: P, timing: ServoTiming) -> Self {
        Self { pwm, timing }
    }
}

impl<P: SetDutyCycle> ServoDriver for PwmServo<P> {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ServoError> {
        let pulse = self.timing.pulse_us(degrees);
        self.pwm
            .set_duty_cycle_fraction(pulse, self.timing.period_us)
            .map_err(|_| ServoError::Output)
    }
}
