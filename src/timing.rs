//! Transition timing configuration.
//!
//! Overlay animation durations and the delays that sequence the transition
//! store are both derived from [`TransitionTimings`], so the two cannot drift
//! apart.

use std::time::Duration;

use thiserror::Error;

/// Error type for invalid timing combinations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimingError {
    /// The startup overlay would be removed before its fade finishes
    #[error("initial_exit_ms ({exit_ms}) must be at least initial_fade_ms ({fade_ms})")]
    InitialExitTooShort { exit_ms: u64, fade_ms: u64 },
}

/// Durations driving both overlay animations and state sequencing.
///
/// All values are milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransitionTimings {
    /// Slide-in duration of each overlay layer
    pub enter_ms: u64,
    /// Slide-out duration of each overlay layer
    pub exit_ms: u64,
    /// Offset between the two overlay layers
    pub layer_stagger_ms: u64,
    /// Wait after router navigation before revealing the new page
    pub settle_ms: u64,
    /// Opacity fade of the startup overlay
    pub initial_fade_ms: u64,
    /// Delay between the startup overlay starting to exit and going idle
    pub initial_exit_ms: u64,
    /// Minimum time the startup overlay stays up
    pub min_display_ms: u64,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            enter_ms: 650,
            exit_ms: 650,
            layer_stagger_ms: 150,
            settle_ms: 800,
            initial_fade_ms: 500,
            initial_exit_ms: 900,
            min_display_ms: 800,
        }
    }
}

impl TransitionTimings {
    /// Check that the startup sequence outlasts its own animation.
    pub fn validate(&self) -> Result<(), TimingError> {
        if self.initial_exit_ms < self.initial_fade_ms {
            return Err(TimingError::InitialExitTooShort {
                exit_ms: self.initial_exit_ms,
                fade_ms: self.initial_fade_ms,
            });
        }
        Ok(())
    }

    /// Time until both layers fully cover the viewport.
    #[inline]
    pub fn cover_duration(&self) -> Duration {
        Duration::from_millis(self.enter_ms + self.layer_stagger_ms)
    }

    /// Time between revealing and both layers being off screen.
    #[inline]
    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.exit_ms + self.layer_stagger_ms)
    }

    #[inline]
    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    #[inline]
    pub fn initial_exit_duration(&self) -> Duration {
        Duration::from_millis(self.initial_exit_ms)
    }

    #[inline]
    pub fn min_display_duration(&self) -> Duration {
        Duration::from_millis(self.min_display_ms)
    }

    /// Length of a full navigation sequence, from click to idle.
    pub fn navigation_duration(&self) -> Duration {
        self.cover_duration() + self.settle_duration() + self.reveal_duration()
    }
}
