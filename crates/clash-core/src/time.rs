//! Tick-based time for the fight simulation
//!
//! - `Tick` - index of a physics step within a match
//! - `Sequence` - monotonically increasing number stamped on every sent intent
//! - `RoundTimer` - countdown shown to the players

use serde::{Deserialize, Serialize};

/// A discrete physics step
pub type Tick = u64;

/// Sequence number of a transmitted intent
pub type Sequence = u64;

/// Countdown for a single round
///
/// Derived display state: it is advanced by whoever drives the physics
/// tick and never consulted by the input buffers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundTimer {
    duration: f32,
    remaining: f32,
}

impl RoundTimer {
    /// Create a timer counting down from `seconds`
    ///
    /// Returns `Err` when `seconds` is not a positive, finite number.
    pub fn new(seconds: f32) -> crate::Result<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(crate::Error::InvalidDuration(seconds));
        }
        Ok(Self {
            duration: seconds,
            remaining: seconds,
        })
    }

    /// Advance by `delta_time` seconds and return the remaining time
    pub fn tick(&mut self, delta_time: f32) -> f32 {
        if delta_time.is_finite() && delta_time > 0.0 {
            self.remaining = (self.remaining - delta_time).max(0.0);
        }
        self.remaining
    }

    /// Remaining seconds
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whole seconds left, as shown on the round clock
    pub fn display_seconds(&self) -> u32 {
        self.remaining as u32
    }

    /// Whether the countdown reached zero
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Restart from the full duration
    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }
}
