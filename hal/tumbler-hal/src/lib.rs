//! Tumbler Hardware Abstraction Layer
//!
//! Persistence traits implemented by chip-specific HALs. Actuators and
//! sensors go through `embedded-hal` directly (see `tumbler-drivers`), so
//! only non-volatile storage needs an abstraction of its own.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tumbler-firmware                       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tumbler-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tumbler-hal-rp2040                     │
//! └─────────────────────────────────────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod flash;

pub use flash::{FlashError, FlashStorage, StorageKey};
