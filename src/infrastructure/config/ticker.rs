//! Odds ticker configuration.

use serde::Deserialize;

use crate::domain::engine::{
    MAX_LOCK_DURATION_MS, MAX_TICK_INTERVAL_MS, MIN_LOCK_DURATION_MS, MIN_TICK_INTERVAL_MS,
};
use crate::domain::TimingBounds;

/// Settings for the simulated live feed.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerConfig {
    /// Shortest wait between ticks (milliseconds).
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Longest wait between ticks (milliseconds).
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
    /// Shortest time an outcome stays locked before new odds land.
    #[serde(default = "default_min_lock_ms")]
    pub min_lock_ms: u64,
    /// Longest time an outcome stays locked before new odds land.
    #[serde(default = "default_max_lock_ms")]
    pub max_lock_ms: u64,
    /// Run the ticker at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Fixed RNG seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_min_interval_ms() -> u64 {
    MIN_TICK_INTERVAL_MS
}

fn default_max_interval_ms() -> u64 {
    MAX_TICK_INTERVAL_MS
}

fn default_min_lock_ms() -> u64 {
    MIN_LOCK_DURATION_MS
}

fn default_max_lock_ms() -> u64 {
    MAX_LOCK_DURATION_MS
}

fn default_enabled() -> bool {
    true
}

impl TickerConfig {
    #[must_use]
    pub const fn bounds(&self) -> TimingBounds {
        TimingBounds {
            min_interval_ms: self.min_interval_ms,
            max_interval_ms: self.max_interval_ms,
            min_lock_ms: self.min_lock_ms,
            max_lock_ms: self.max_lock_ms,
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            min_lock_ms: default_min_lock_ms(),
            max_lock_ms: default_max_lock_ms(),
            enabled: default_enabled(),
            seed: None,
        }
    }
}
