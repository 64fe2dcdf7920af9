//! Settings persistence
//!
//! Maps the core's settings onto flash storage keys and loads them into
//! the RAM cache the controller works from.

use defmt::*;

use tumbler_core::config::{Setting, SettingsCache};
use tumbler_hal::{FlashError, FlashStorage, StorageKey};

/// Flash key holding a setting
pub fn storage_key(setting: Setting) -> StorageKey {
    match setting {
        Setting::FirstZone => StorageKey::FirstZone,
        Setting::ServoBottom => StorageKey::ServoBottom,
    }
}

/// Read every setting from flash
///
/// Missing values are left out of the cache; the core substitutes defaults
/// and queues them for writing. A corrupted partition is erased so the
/// defaults can be stored.
pub async fn load_settings<F: FlashStorage>(storage: &mut F) -> SettingsCache {
    let mut cache = SettingsCache::new();

    for setting in Setting::ALL {
        let mut buffer = [0u8; 1];
        match storage.read(storage_key(setting), &mut buffer).await {
            Ok(1) => {
                debug!("Loaded {:?} = {}", setting, buffer[0]);
                cache.preload(setting, buffer[0]);
            }
            Ok(len) => warn!("{:?} has unexpected length {}", setting, len),
            Err(FlashError::NotFound) => info!("{:?} not stored yet", setting),
            Err(FlashError::Corrupted) => {
                error!("Settings partition corrupted, erasing");
                if let Err(e) = storage.erase_all().await {
                    error!("Failed to erase settings: {:?}", e);
                }
                return SettingsCache::new();
            }
            Err(e) => warn!("Failed to read {:?}: {:?}", setting, e),
        }
    }

    cache
}
