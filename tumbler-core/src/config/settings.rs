//! Persisted settings
//!
//! The machine keeps two single-byte calibration values in non-volatile
//! storage. The core reads and writes them through [`SettingsStore`]; the
//! firmware backs that with a RAM cache that is flushed to flash from a
//! separate task.

/// Number of persisted settings
pub const SETTING_COUNT: usize = 2;

/// Persisted setting identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    /// Dial position of the first zone (on the zone grid)
    FirstZone,
    /// Calibrated bottom endpoint of the puller servo
    ServoBottom,
}

impl Setting {
    /// All settings, in storage order
    pub const ALL: [Setting; SETTING_COUNT] = [Setting::FirstZone, Setting::ServoBottom];

    /// Index of this setting in storage order
    pub const fn index(self) -> usize {
        match self {
            Setting::FirstZone => 0,
            Setting::ServoBottom => 1,
        }
    }
}

/// Errors from settings access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Setting has never been written
    NotFound,
}

/// Synchronous key-value access to the persisted settings
///
/// Writes always land in RAM first; persisting them to slow storage is the
/// owner's job, so `store` cannot fail.
pub trait SettingsStore {
    /// Read a setting
    fn load(&mut self, setting: Setting) -> Result<u8, SettingsError>;

    /// Write a setting
    fn store(&mut self, setting: Setting, value: u8);
}

impl<T: SettingsStore + ?Sized> SettingsStore for &mut T {
    fn load(&mut self, setting: Setting) -> Result<u8, SettingsError> {
        (**self).load(setting)
    }

    fn store(&mut self, setting: Setting, value: u8) {
        (**self).store(setting, value)
    }
}

/// In-memory settings with write tracking
///
/// Holds the current value of every setting and remembers which ones were
/// written since the last [`take_dirty`](Self::take_dirty), so slow storage
/// can be updated outside the control loop.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsCache {
    values: [Option<u8>; SETTING_COUNT],
    dirty: [bool; SETTING_COUNT],
}

impl SettingsCache {
    /// Create an empty cache (every setting missing)
    pub const fn new() -> Self {
        Self {
            values: [None; SETTING_COUNT],
            dirty: [false; SETTING_COUNT],
        }
    }

    /// Seed a value read from storage without marking it dirty
    pub fn preload(&mut self, setting: Setting, value: u8) {
        self.values[setting.index()] = Some(value);
    }

    /// Current value of a setting, if present
    pub fn get(&self, setting: Setting) -> Option<u8> {
        self.values[setting.index()]
    }

    /// Check whether any setting awaits persisting
    pub fn is_dirty(&self) -> bool {
        self.dirty.iter().any(|d| *d)
    }

    /// Take the next pending write, clearing its dirty flag
    pub fn take_dirty(&mut self) -> Option<(Setting, u8)> {
        for setting in Setting::ALL {
            let i = setting.index();
            if self.dirty[i] {
                self.dirty[i] = false;
                if let Some(value) = self.values[i] {
                    return Some((setting, value));
                }
            }
        }
        None
    }
}

impl SettingsStore for SettingsCache {
    fn load(&mut self, setting: Setting) -> Result<u8, SettingsError> {
        self.get(setting).ok_or(SettingsError::NotFound)
    }

    fn store(&mut self, setting: Setting, value: u8) {
        let i = setting.index();
        // Only mark dirty on change, like an EEPROM update
        if self.values[i] != Some(value) {
            self.values[i] = Some(value);
            self.dirty[i] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_reports_not_found() {
        let mut cache = SettingsCache::new();
        assert_eq!(cache.load(Setting::FirstZone), Err(SettingsError::NotFound));
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_preload_is_not_dirty() {
        let mut cache = SettingsCache::new();
        cache.preload(Setting::ServoBottom, 140);
        assert_eq!(cache.load(Setting::ServoBottom), Ok(140));
        assert!(!cache.is_dirty());
        assert_eq!(cache.take_dirty(), None);
    }

    #[test]
    fn test_store_marks_dirty_once() {
        let mut cache = SettingsCache::new();
        cache.store(Setting::FirstZone, 2);
        cache.store(Setting::ServoBottom, 150);
        assert!(cache.is_dirty());

        assert_eq!(cache.take_dirty(), Some((Setting::FirstZone, 2)));
        assert_eq!(cache.take_dirty(), Some((Setting::ServoBottom, 150)));
        assert_eq!(cache.take_dirty(), None);
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_store_same_value_stays_clean() {
        let mut cache = SettingsCache::new();
        cache.preload(Setting::FirstZone, 4);
        cache.store(Setting::FirstZone, 4);
        assert!(!cache.is_dirty());
    }
}
