//! Load statistics snapshot

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Point-in-time load counters for a registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Payload loads that began (Starting emitted)
    pub started: u64,
    /// Payload loads that finished successfully
    pub completed: u64,
    /// Payload loads that returned an error or panicked
    pub failed: u64,
    /// Load calls dropped because the entry was cached or in flight
    pub skipped: u64,
    /// Invalidations applied (full invalidate or clear)
    pub invalidations: u64,
    /// Cumulative wall time spent inside payload loads, in microseconds
    pub load_time_micros: u64,
}

impl LoadStats {
    /// Fraction of started loads that completed successfully
    pub fn success_rate(&self) -> f64 {
        if self.started == 0 {
            0.0
        } else {
            self.completed as f64 / self.started as f64
        }
    }

    /// Mean time per finished load (successful or failed)
    pub fn average_load_time(&self) -> Option<Duration> {
        let finished = self.completed + self.failed;
        if finished == 0 {
            None
        } else {
            Some(Duration::from_micros(self.load_time_micros / finished))
        }
    }
}
