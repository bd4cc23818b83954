//! Configuration loading
//!
//! Builds a `CacheConfig` from environment variables, `.env` and config
//! files.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
