//! Single-shot dwell timer
//!
//! Gated on a millisecond clock supplied by the caller, so the same code
//! runs against the embassy clock and against simulated time in tests.

/// One-shot timer that elapses `duration_ms` after [`start`](Self::start)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DwellTimer {
    duration_ms: u32,
    started_at: Option<u32>,
}

impl DwellTimer {
    /// Create a stopped timer
    pub const fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            started_at: None,
        }
    }

    /// Start (or restart) the timer
    pub fn start(&mut self, now_ms: u32) {
        self.started_at = Some(now_ms);
    }

    /// Cancel the timer
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Check if the timer is armed
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Check whether the timer has elapsed
    ///
    /// A stopped timer never elapses. The clock may wrap.
    pub fn poll(&self, now_ms: u32) -> bool {
        match self.started_at {
            Some(start) => now_ms.wrapping_sub(start) >= self.duration_ms,
            None => false,
        }
    }
}
