//! Board-agnostic core logic for the lock cracking firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (stepper, servo, limit switch)
//! - Combination enumeration over the dial's zone grid
//! - Non-blocking stepper and servo control
//! - The attempt sequencer and its dwell timers
//! - Session state machine and controller
//! - Configuration and persisted settings

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod algorithm;
pub mod combination;
pub mod config;
pub mod control;
pub mod controller;
pub mod report;
pub mod state;
pub mod traits;
