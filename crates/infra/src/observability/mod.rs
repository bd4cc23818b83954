//! Logging setup for processes embedding the cache

pub mod logging;

pub use logging::init_tracing;
