//! RP2040-specific HAL for the lock cracking firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `tumbler-hal` traits, plus RP2040-specific functionality:
//!
//! - Flash storage driver (implements `tumbler_hal::FlashStorage`)
//! - 50 Hz PWM setup for the puller servo

#![no_std]

pub mod flash;
pub mod pwm;
