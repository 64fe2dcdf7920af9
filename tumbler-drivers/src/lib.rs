//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tumbler-core on top of `embedded-hal` 1.0:
//!
//! - Step/direction stepper drivers (EasyDriver, A4988, DRV8825)
//! - PWM hobby servos
//! - GPIO limit switches

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod limit_switch;
pub mod servo;
pub mod stepper;

pub use limit_switch::GpioLimitSwitch;
pub use servo::{PwmServo, ServoTiming};
pub use stepper::{StepDirConfig, StepDirStepper};
