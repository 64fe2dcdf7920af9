//! Calibration helpers
//!
//! Converts operator input into stored calibration values and validates
//! values read back from storage.

use super::hardware::DialGeometry;
use super::settings::{Setting, SettingsStore};

/// First zone used when the stored one is missing or off the grid
///
/// Dial digit 0 plus the default center offset.
pub const DEFAULT_FIRST_ZONE: u8 = 2;

/// Convert the dial digit marking the first zone into a first-zone offset
///
/// The operator reads the digit (0 up to one zone step) printed at the first
/// zone; the offset stored is that digit shifted to the zone's center and
/// folded back so it is the lowest equivalent grid position.
pub fn first_zone_from_digit(dial: &DialGeometry, digit: u8) -> Option<u8> {
    if digit >= dial.zone_offset {
        return None;
    }
    let mut zone = digit + dial.center_offset;
    if zone >= dial.zone_offset {
        zone -= dial.zone_offset;
    }
    Some(zone)
}

/// Load the first zone, repairing a missing or off-grid value
///
/// A repaired value is written back so the next boot reads a valid one.
pub fn load_first_zone<S: SettingsStore>(settings: &mut S, dial: &DialGeometry) -> u8 {
    match settings.load(Setting::FirstZone) {
        Ok(zone) if dial.is_valid_first_zone(zone) => zone,
        _ => {
            settings.store(Setting::FirstZone, DEFAULT_FIRST_ZONE);
            DEFAULT_FIRST_ZONE
        }
    }
}
