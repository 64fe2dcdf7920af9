//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use tumbler_core::state::InputEvent;
use tumbler_hal::StorageKey;

/// Channel capacity for button events
const INPUT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for settings writes (one slot per setting, plus slack)
const SETTINGS_CHANNEL_SIZE: usize = 4;

/// Button presses from the input tasks
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, InputEvent, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Request to persist one setting
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct SettingsWrite {
    pub key: StorageKey,
    pub value: u8,
}

/// Settings writes from the controller to the flash task
pub static SETTINGS_WRITE: Channel<CriticalSectionRawMutex, SettingsWrite, SETTINGS_CHANNEL_SIZE> =
    Channel::new();
