//! GPIO limit switch

use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use tumbler_core::traits::{LimitSwitch, SwitchState};

/// Limit switch on a digital input
///
/// With `active_high` the switch reads activated when the pin is high,
/// which suits a normally-open switch to VCC with a pull-down.
pub struct GpioLimitSwitch<P> {
    pin: P,
    active_high: bool,
}

impl<P: InputPin<Error = Infallible>> GpioLimitSwitch<P> {
    /// Create a new limit switch
    pub fn new(pin: P, active_high: bool) -> Self {
        Self { pin, active_high }
    }
}

impl<P: InputPin<Error = Infallible>> LimitSwitch for GpioLimitSwitch<P> {
    fn state(&mut self) -> SwitchState {
        let high = matches!(self.pin.is_high(), Ok(true));
        if high == self.active_high {
            SwitchState::Activated
        } else {
            SwitchState::Released
        }
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal::digital::ErrorType;

    use super::*;

    struct FakeInput {
        high: bool,
    }

    impl ErrorType for FakeInput {
        type Error = Infallible;
    }

    impl InputPin for FakeInput {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high)
        }
    }

    #[test]
    fn test_active_high() {
        let mut switch = GpioLimitSwitch::new(FakeInput { high: false }, true);
        assert_eq!(switch.state(), SwitchState::Released);

        switch.pin.high = true;
        assert_eq!(switch.state(), SwitchState::Activated);
        assert!(switch.is_activated());
    }

    #[test]
    fn test_active_low() {
        let mut switch = GpioLimitSwitch::new(FakeInput { high: true }, false);
        assert!(!switch.is_activated());

        switch.pin.high = false;
        assert_eq!(switch.state(), SwitchState::Activated);
    }
}
