//! Puller servo control
//!
//! The puller has two endpoints derived from a calibrated bottom position.
//! Calibration nudges move the arm in fixed increments but never outside
//! the safe range of [`ServoLimits`].

use crate::config::{Setting, ServoLimits, SettingsStore};
use crate::traits::{ServoDriver, ServoError};

/// Puller servo controller
pub struct ServoControl<V> {
    driver: V,
    limits: ServoLimits,
    top: u8,
    bottom: u8,
    current: u8,
}

impl<V: ServoDriver> ServoControl<V> {
    /// Create a controller using the default endpoints
    ///
    /// Nothing is written to the servo until a move is requested.
    pub fn new(driver: V, limits: ServoLimits) -> Self {
        let (top, bottom) = default_endpoints(&limits);
        Self {
            driver,
            limits,
            top,
            bottom,
            current: bottom,
        }
    }

    /// Load the calibrated endpoints and park the arm at the bottom
    pub fn init<S: SettingsStore>(&mut self, settings: &mut S) -> Result<(), ServoError> {
        self.reconfig(settings);
        self.move_bottom()
    }

    /// Reload the endpoints from settings
    ///
    /// A missing or unsafe bottom is replaced by the default and written
    /// back.
    pub fn reconfig<S: SettingsStore>(&mut self, settings: &mut S) {
        let stored = settings.load(Setting::ServoBottom).ok();

        let (top, bottom) = match stored.and_then(|bottom| self.limits.endpoints(bottom)) {
            Some(endpoints) => endpoints,
            None => {
                settings.store(Setting::ServoBottom, self.limits.default_bottom);
                default_endpoints(&self.limits)
            }
        };

        self.top = top;
        self.bottom = bottom;
    }

    /// Raise the arm to pull the shackle
    pub fn move_top(&mut self) -> Result<(), ServoError> {
        self.write(self.top)
    }

    /// Lower the arm to its resting position
    pub fn move_bottom(&mut self) -> Result<(), ServoError> {
        self.write(self.bottom)
    }

    /// Move one increment up (smaller angle)
    pub fn nudge_up(&mut self) -> Result<(), ServoError> {
        let target = self.current.saturating_sub(self.limits.increment);
        self.write(self.limits.clamp(target))
    }

    /// Move one increment down (larger angle)
    pub fn nudge_down(&mut self) -> Result<(), ServoError> {
        let target = self.current.saturating_add(self.limits.increment);
        self.write(self.limits.clamp(target))
    }

    /// Last angle the servo accepted
    pub fn current_position(&self) -> u8 {
        self.current
    }

    /// Top endpoint currently in use
    pub fn top(&self) -> u8 {
        self.top
    }

    /// Bottom endpoint currently in use
    pub fn bottom(&self) -> u8 {
        self.bottom
    }

    /// Get access to the underlying driver
    pub fn driver(&self) -> &V {
        &self.driver
    }

    fn write(&mut self, angle: u8) -> Result<(), ServoError> {
        self.driver.write_angle(angle)?;
        self.current = angle;
        Ok(())
    }
}

fn default_endpoints(limits: &ServoLimits) -> (u8, u8) {
    let bottom = limits.default_bottom;
    limits
        .endpoints(bottom)
        .unwrap_or((bottom.saturating_sub(limits.travel), bottom))
}
