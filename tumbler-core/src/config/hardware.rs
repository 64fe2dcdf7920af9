//! Hardware configuration types
//!
//! These types describe the fixed mechanical layout of the machine: the
//! dial's zone grid, the stepper resolution, the servo's safe travel and
//! the dwell times of the pull cycle. Defaults match the shipped hardware.

/// Dial and stepper geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialGeometry {
    /// Number of marked positions on the dial
    pub positions: u8,
    /// Distance between neighbouring zones, in dial positions
    pub zone_offset: u8,
    /// Number of zones on the dial
    pub zones: u8,
    /// Offset from a zone's dial mark to its approximate center
    pub center_offset: u8,
    /// Full steps per dial revolution
    pub steps_per_rev: u16,
}

impl Default for DialGeometry {
    fn default() -> Self {
        Self {
            positions: 60,
            zone_offset: 6,
            zones: 10,
            center_offset: 2,
            steps_per_rev: 200,
        }
    }
}

impl DialGeometry {
    /// Convert a dial position to an absolute step index
    ///
    /// Truncates, so positions between two steps land on the lower one.
    pub fn position_to_step(&self, position: u8) -> u16 {
        ((position as u32 * self.steps_per_rev as u32) / self.positions as u32) as u16
    }

    /// Dial position of the `k`-th zone counted from `first_zone`
    pub fn grid_point(&self, first_zone: u8, k: u8) -> u8 {
        first_zone + k * self.zone_offset
    }

    /// Check that a first-zone offset lies on the grid
    ///
    /// The offset must be below one zone step, otherwise the last zone
    /// would fall off the end of the dial.
    pub fn is_valid_first_zone(&self, first_zone: u8) -> bool {
        first_zone < self.zone_offset
    }

    /// Number of legal combinations (adjacent digits differ)
    pub fn legal_combinations(&self) -> u32 {
        let z = self.zones as u32;
        z * (z - 1) * (z - 1)
    }
}

/// Dwell times for the pull cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DwellConfig {
    /// Time the puller holds the top position while the switch is watched (ms)
    pub lift_ms: u32,
    /// Time allowed for the puller to return to the bottom (ms)
    pub lower_ms: u32,
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            lift_ms: 500,
            lower_ms: 300,
        }
    }
}

/// Servo travel limits in servo degrees
///
/// Smaller angles are higher up: the top endpoint is the bottom endpoint
/// minus `travel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoLimits {
    /// Distance between the bottom and top endpoints
    pub travel: u8,
    /// Step used by calibration nudges
    pub increment: u8,
    /// Lowest safe position (largest angle)
    pub bottom_limit: u8,
    /// Highest safe position (smallest angle)
    pub top_limit: u8,
    /// Bottom endpoint used when the stored one is missing or unsafe
    pub default_bottom: u8,
}

impl Default for ServoLimits {
    fn default() -> Self {
        Self {
            travel: 40,
            increment: 20,
            bottom_limit: 160,
            top_limit: 80,
            default_bottom: 140,
        }
    }
}

impl ServoLimits {
    /// Top endpoint for a given bottom, if the pair is inside the safe range
    pub fn endpoints(&self, bottom: u8) -> Option<(u8, u8)> {
        let top = bottom.checked_sub(self.travel)?;
        if bottom > self.bottom_limit || top < self.top_limit {
            return None;
        }
        Some((top, bottom))
    }

    /// Clamp a position into the safe range
    pub fn clamp(&self, position: u8) -> u8 {
        position.clamp(self.top_limit, self.bottom_limit)
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineConfig {
    pub dial: DialGeometry,
    pub dwell: DwellConfig,
    pub servo: ServoLimits,
}
