//! Thread-safe event capture for callback assertions
//!
//! Load and invalidate handlers fire on whichever thread runs the operation.
//! `EventRecorder` hands out a cloneable sink for those handlers and lets the
//! test block until the expected number of events arrived.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Records values pushed from any thread, in arrival order
#[derive(Debug)]
pub struct EventRecorder<T> {
    inner: Arc<Shared<T>>,
}

#[derive(Debug)]
struct Shared<T> {
    events: Mutex<Vec<T>>,
    changed: Condvar,
}

impl<T> Clone for EventRecorder<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for EventRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventRecorder<T> {
    /// Empty recorder.
    pub fn new() -> Self {
        Self { inner: Arc::new(Shared { events: Mutex::new(Vec::new()), changed: Condvar::new() }) }
    }

    /// Append an event and wake any waiter.
    pub fn record(&self, event: T) {
        let mut events = self.inner.events.lock();
        events.push(event);
        self.inner.changed.notify_all();
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.inner.events.lock().len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.inner.events.lock().clear();
    }

    /// Block until at least `count` events were recorded.
    ///
    /// Returns `false` if the timeout elapsed first.
    pub fn wait_for_len(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut events = self.inner.events.lock();
        while events.len() < count {
            if self.inner.changed.wait_until(&mut events, deadline).timed_out() {
                return events.len() >= count;
            }
        }
        true
    }
}

impl<T: Clone> EventRecorder<T> {
    /// Copy of every event recorded so far.
    pub fn events(&self) -> Vec<T> {
        self.inner.events.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_order() {
        let recorder = EventRecorder::new();
        recorder.record("starting");
        recorder.record("loaded");

        assert_eq!(recorder.events(), vec!["starting", "loaded"]);
        assert_eq!(recorder.len(), 2);

        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_wait_for_len_sees_other_threads() {
        let recorder = EventRecorder::new();
        let sink = recorder.clone();

        let handle = std::thread::spawn(move || {
            for i in 0..3 {
                std::thread::sleep(Duration::from_millis(5));
                sink.record(i);
            }
        });

        assert!(recorder.wait_for_len(3, Duration::from_secs(1)));
        handle.join().unwrap();
        assert_eq!(recorder.events(), vec![0, 1, 2]);
    }

    #[test]
    fn test_wait_for_len_times_out() {
        let recorder: EventRecorder<u8> = EventRecorder::new();
        assert!(!recorder.wait_for_len(1, Duration::from_millis(20)));
    }
}
