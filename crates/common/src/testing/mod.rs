//! Testing utilities and helpers
//!
//! - **[`assertions`]**: `assert_eventually!` and `assert_error_contains!`
//! - **[`recorder`]**: [`EventRecorder`], a cross-thread sink for callback
//!   events with a blocking `wait_for_len`
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "test-utils")]
//! # {
//! use std::time::Duration;
//!
//! use lazycache_common::testing::EventRecorder;
//!
//! let statuses = EventRecorder::new();
//! let sink = statuses.clone();
//! std::thread::spawn(move || sink.record("loaded"));
//!
//! assert!(statuses.wait_for_len(1, Duration::from_secs(1)));
//! # }
//! ```

pub mod assertions;
pub mod recorder;

// Note: Macros exported with #[macro_export] are available at crate root
pub use recorder::EventRecorder;
