//! Display-effect and store notification configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::application::effects::{DisplayTimings, PULSE_CLEAR_MS, REPLACEMENT_CLEAR_MS};
use crate::application::store::DEFAULT_NOTIFICATION_CAPACITY;

/// How long transient indicators stay visible.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_pulse_clear_ms")]
    pub pulse_clear_ms: u64,
    #[serde(default = "default_replacement_clear_ms")]
    pub replacement_clear_ms: u64,
}

fn default_pulse_clear_ms() -> u64 {
    PULSE_CLEAR_MS
}

fn default_replacement_clear_ms() -> u64 {
    REPLACEMENT_CLEAR_MS
}

impl DisplayConfig {
    #[must_use]
    pub const fn timings(&self) -> DisplayTimings {
        DisplayTimings {
            pulse_clear: Duration::from_millis(self.pulse_clear_ms),
            replacement_clear: Duration::from_millis(self.replacement_clear_ms),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            pulse_clear_ms: default_pulse_clear_ms(),
            replacement_clear_ms: default_replacement_clear_ms(),
        }
    }
}

/// Store notification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Broadcast buffer per subscriber.
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
}

fn default_notification_capacity() -> usize {
    DEFAULT_NOTIFICATION_CAPACITY
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            notification_capacity: default_notification_capacity(),
        }
    }
}
