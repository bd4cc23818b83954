//! Custom assertions for testing
//!
//! Background invalidations and bulk loads finish on worker threads, so most
//! cache tests assert on state that becomes true "soon". These macros cover
//! that plus error-message checks.

/// Assert that an error contains a specific substring
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-utils")]
/// # {
/// let result: Result<(), String> = Err("DataStore is undefined".to_string());
/// lazycache_common::assert_error_contains!(result, "undefined");
/// # }
/// ```
#[macro_export]
macro_rules! assert_error_contains {
    ($result:expr, $substring:expr) => {
        match &$result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => {
                let error_msg = format!("{}", e);
                assert!(
                    error_msg.contains($substring),
                    "Error message '{}' does not contain '{}'",
                    error_msg,
                    $substring
                );
            }
        }
    };
}

/// Assert that a condition eventually becomes true within a timeout
///
/// Polls every 10ms on the current thread. Usable from plain `#[test]`
/// functions, which is where cache tests drive their own worker pools.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-utils")]
/// # {
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let flag_clone = Arc::clone(&flag);
/// std::thread::spawn(move || {
///     std::thread::sleep(Duration::from_millis(20));
///     flag_clone.store(true, Ordering::SeqCst);
/// });
///
/// lazycache_common::assert_eventually!(Duration::from_secs(1), flag.load(Ordering::SeqCst));
/// # }
/// ```
#[macro_export]
macro_rules! assert_eventually {
    ($timeout:expr, $condition:expr) => {{
        let start = std::time::Instant::now();
        let timeout = $timeout;
        let mut last_value = false;

        while start.elapsed() < timeout {
            last_value = $condition;
            if last_value {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        assert!(last_value, "Condition did not become true within {:?}", timeout);
    }};
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_assert_error_contains_matches() {
        let result: Result<(), String> = Err("store write failed: disk full".to_string());
        crate::assert_error_contains!(result, "disk full");
    }

    #[test]
    #[should_panic(expected = "Expected error but got Ok")]
    fn test_assert_error_contains_panics_on_ok() {
        let result: Result<(), String> = Ok(());
        crate::assert_error_contains!(result, "anything");
    }

    #[test]
    fn test_assert_eventually_waits_for_other_thread() {
        let counter = Arc::new(AtomicUsize::new(0));
        let worker = Arc::clone(&counter);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            worker.store(3, Ordering::SeqCst);
        });

        crate::assert_eventually!(Duration::from_secs(1), counter.load(Ordering::SeqCst) == 3);
        handle.join().unwrap();
    }

    #[test]
    #[should_panic(expected = "Condition did not become true")]
    fn test_assert_eventually_times_out() {
        crate::assert_eventually!(Duration::from_millis(30), false);
    }
}
