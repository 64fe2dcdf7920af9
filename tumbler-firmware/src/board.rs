//! Board wiring for a Raspberry Pi Pico
//!
//! | Function      | GPIO | Notes                           |
//! |---------------|------|---------------------------------|
//! | STEP          | 2    | EasyDriver / A4988 STEP         |
//! | DIR           | 3    | low = clockwise                 |
//! | EN            | 4    | active low                      |
//! | Buttons       | 10-13| Next, Previous, Select, Back    |
//! | Servo         | 14   | PWM slice 7 channel A           |
//! | Limit switch  | 15   | to 3V3, pulled down             |

use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::PwmOutput;
use embassy_time::Delay;

use tumbler_core::config::SettingsCache;
use tumbler_core::controller::Controller;
use tumbler_drivers::{GpioLimitSwitch, PwmServo, StepDirStepper};

/// Dial stepper on GPIO step/dir/enable lines
pub type DialStepper = StepDirStepper<Output<'static>, Output<'static>, Output<'static>, Delay>;

/// Puller servo on a PWM channel
pub type PullerServo = PwmServo<PwmOutput<'static>>;

/// Shackle limit switch
pub type ShackleSwitch = GpioLimitSwitch<Input<'static>>;

/// The controller as wired on this board
pub type BoardController = Controller<DialStepper, PullerServo, ShackleSwitch, SettingsCache>;
