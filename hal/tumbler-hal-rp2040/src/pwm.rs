//! Servo PWM setup
//!
//! Hobby servos expect a 50 Hz frame. The slice counter runs from the
//! system clock through a fixed divider; `top` is chosen so one wrap takes
//! 20 ms.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{ChannelAPin, Config, Pwm, PwmOutput, Slice};
use embassy_rp::Peri;

/// Servo frame rate
pub const SERVO_FRAME_HZ: u32 = 50;

/// Clock divider; keeps `top` inside 16 bits at 125 MHz
pub const SERVO_DIVIDER: u8 = 64;

/// Counter wrap value for a 50 Hz frame at the given system clock
pub fn servo_top(clk_sys_hz: u32) -> u16 {
    let counts = clk_sys_hz / (SERVO_DIVIDER as u32 * SERVO_FRAME_HZ);
    counts.saturating_sub(1).min(u16::MAX as u32) as u16
}

/// PWM configuration for a servo frame, output initially low
pub fn servo_config() -> Config {
    let mut config = Config::default();
    config.divider = SERVO_DIVIDER.into();
    config.top = servo_top(clk_sys_freq());
    config.compare_a = 0;
    config
}

/// Set up channel A of a slice as a servo output
pub fn servo_output<'d, T: Slice>(
    slice: Peri<'d, T>,
    pin: Peri<'d, impl ChannelAPin<T>>,
) -> Option<PwmOutput<'d>> {
    let pwm = Pwm::new_output_a(slice, pin, servo_config());
    let (a, _) = pwm.split();
    a
}
