//! Run results for display
//!
//! Formats the numbers shown on the results page without allocating.

use core::fmt::Write;

use heapless::String;

use crate::combination::Combination;

/// Snapshot of a run for the results page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunReport {
    /// Last combination dialed (the opening one after an unlock)
    pub combination: Option<Combination>,
    /// Number of pulls made
    pub attempts: u32,
    /// Number of legal combinations the run can try
    pub total: u32,
    /// Time since the run started
    pub elapsed_ms: u32,
}

impl RunReport {
    /// Elapsed time as `HH:MM:SS`
    pub fn elapsed(&self) -> String<16> {
        format_elapsed(self.elapsed_ms)
    }

    /// Attempts as `X out of N`
    pub fn progress(&self) -> String<32> {
        let mut out = String::new();
        let _ = write!(out, "{} out of {}", self.attempts, self.total);
        out
    }

    /// Combination as `ff-ss-tt`, or dashes before the first attempt
    pub fn combination(&self) -> String<16> {
        match self.combination {
            Some(combo) => format_combination(&combo),
            None => {
                let mut out = String::new();
                let _ = out.push_str("--------");
                out
            }
        }
    }
}

/// Render milliseconds as `HH:MM:SS`
///
/// Hours are not wrapped, so very long runs print more than two digits.
pub fn format_elapsed(ms: u32) -> String<16> {
    let total = ms / 1000;
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;

    let mut out = String::new();
    // Capacity covers the widest u32 value
    let _ = write!(out, "{:02}:{:02}:{:02}", hours, minutes, seconds);
    out
}

/// Render a combination as `ff-ss-tt`
pub fn format_combination(combo: &Combination) -> String<16> {
    let mut out = String::new();
    let _ = write!(
        out,
        "{:02}-{:02}-{:02}",
        combo.first, combo.second, combo.third
    );
    out
}
