//! Configuration types
//!
//! Compile-time machine geometry plus the two persisted calibration bytes.

pub mod calibration;
pub mod hardware;
pub mod settings;

pub use calibration::*;
pub use hardware::*;
pub use settings::*;
