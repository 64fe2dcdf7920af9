//! Stepper motor driver trait
//!
//! This trait abstracts over step/direction driver boards (EasyDriver,
//! A4988, DRV8825, ...).

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise rotation (step index increases)
    Clockwise,
    /// Counter-clockwise rotation (step index decreases)
    CounterClockwise,
}

/// Trait for step/direction stepper drivers
///
/// The driver only moves the shaft; position bookkeeping lives in
/// [`StepperControl`](crate::control::StepperControl).
pub trait StepperDriver {
    /// Set the rotation direction for following steps
    fn set_direction(&mut self, dir: Direction);

    /// Emit exactly one step pulse
    ///
    /// May block for the driver's minimum pulse and settling times, which
    /// must stay short (a few milliseconds at most).
    fn step(&mut self);

    /// Enable or disable the motor driver
    ///
    /// When disabled, the motor is free to rotate and does not hold position.
    fn enable(&mut self, enabled: bool);

    /// Check if the motor is enabled
    fn is_enabled(&self) -> bool;
}
