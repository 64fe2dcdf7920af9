//! Hobby servo trait

/// Servo output failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError {
    /// The output rejected the pulse width
    Output,
}

/// Trait for angle-controlled servos
pub trait ServoDriver {
    /// Command the servo to an angle in degrees (0-180)
    fn write_angle(&mut self, degrees: u8) -> Result<(), ServoError>;
}
