//! Limit switch trait

/// Limit switch reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchState {
    /// Shackle still latched
    Released,
    /// Shackle pulled open
    Activated,
}

/// Trait for the shackle limit switch
///
/// Takes `&mut self` because GPIO reads typically require mutable access.
pub trait LimitSwitch {
    /// Read the current switch state
    fn state(&mut self) -> SwitchState;

    /// Check if the switch is activated
    fn is_activated(&mut self) -> bool {
        self.state() == SwitchState::Activated
    }
}
