//! Load metrics collection
//!
//! Counters are plain atomics so entries can record from any worker thread
//! without taking a lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use lazycache_domain::LoadStats;

/// Thread-safe collector shared by a registry and its entries
#[derive(Debug, Default)]
pub struct LoadMetrics {
    started: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
    invalidations: AtomicU64,
    load_time_micros: AtomicU64,
}

impl LoadMetrics {
    /// Counters all at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_started(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed(&self, elapsed: Duration) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.add_time(elapsed);
    }

    pub(crate) fn record_failed(&self, elapsed: Duration) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.add_time(elapsed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    fn add_time(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.load_time_micros.fetch_add(micros, Ordering::Relaxed);
    }

    /// Current counter values.
    pub fn snapshot(&self) -> LoadStats {
        LoadStats {
            started: self.started.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            load_time_micros: self.load_time_micros.load(Ordering::Relaxed),
        }
    }
}
