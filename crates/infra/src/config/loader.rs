//! Configuration loader
//!
//! Loads cache configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment when one exists
//! 2. Attempts to load from environment variables
//! 3. If `LAZYCACHE_STORE_KIND` is unset, falls back to a config file
//! 4. If no config file exists either, uses `CacheConfig::default()`
//!
//! ## Environment Variables
//! - `LAZYCACHE_STORE_KIND`: `memory` or `file` (required for env loading)
//! - `LAZYCACHE_STORE_PATH`: Snapshot path for the file store
//! - `LAZYCACHE_WORKER_THREADS`: Async worker threads
//! - `LAZYCACHE_MAX_BLOCKING_THREADS`: Payload load threads
//! - `LAZYCACHE_LOG_FILTER`: Tracing filter directive
//! - `LAZYCACHE_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./lazycache.{json,toml}` then `./config.{json,toml}`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names relative to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use lazycache_domain::constants::{
    ENV_LOG_FILTER, ENV_LOG_JSON, ENV_MAX_BLOCKING_THREADS, ENV_STORE_KIND, ENV_STORE_PATH,
    ENV_WORKER_THREADS,
};
use lazycache_domain::{CacheConfig, CacheError, Result, StoreKind};

const CONFIG_FILE_NAMES: [&str; 4] = ["lazycache.json", "lazycache.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CacheError::Config` if an environment variable or config file is
/// present but invalid, and `CacheError::InvalidArgument` if the resulting
/// configuration fails validation.
pub fn load() -> Result<CacheConfig> {
    load_dotenv();

    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) if std::env::var(ENV_STORE_KIND).is_ok() => return Err(e),
        Err(e) => {
            tracing::debug!(error = %e, "Environment incomplete, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path))?,
                None => {
                    tracing::info!("No configuration found, using defaults");
                    CacheConfig::default()
                }
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `LAZYCACHE_STORE_KIND` is required; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `CacheError::Config` if the store kind is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<CacheConfig> {
    let mut config = CacheConfig::default();

    config.store.kind = StoreKind::from_str(&env_var(ENV_STORE_KIND)?)
        .map_err(|e| CacheError::Config(format!("Invalid {ENV_STORE_KIND}: {e}")))?;
    config.store.path = std::env::var(ENV_STORE_PATH).ok().map(PathBuf::from);

    if let Some(threads) = env_usize(ENV_WORKER_THREADS)? {
        config.workers.worker_threads = threads;
    }
    if let Some(threads) = env_usize(ENV_MAX_BLOCKING_THREADS)? {
        config.workers.max_blocking_threads = threads;
    }

    if let Ok(filter) = std::env::var(ENV_LOG_FILTER) {
        config.logging.filter = filter;
    }
    config.logging.json = env_bool(ENV_LOG_JSON, config.logging.json);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. JSON and TOML are
/// supported (detected by file extension); missing sections use defaults.
///
/// # Errors
/// Returns `CacheError::Config` if the file is missing, no file is found
/// when probing, or the contents do not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<CacheConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CacheError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CacheError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CacheError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<CacheConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CacheError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CacheError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(CacheError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        roots.extend([exe_dir.clone(), exe_dir.join(".."), exe_dir.join("../..")]);
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Could not load .env file"),
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| CacheError::Config(format!("Missing required environment variable: {key}")))
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| CacheError::Config(format!("Invalid {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use lazycache_domain::constants::DEFAULT_WORKER_THREADS;
    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 6] = [
        ENV_STORE_KIND,
        ENV_STORE_PATH,
        ENV_WORKER_THREADS,
        ENV_MAX_BLOCKING_THREADS,
        ENV_LOG_FILTER,
        ENV_LOG_JSON,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("LAZYCACHE_TEST_BOOL_ON", "ON");
        std::env::set_var("LAZYCACHE_TEST_BOOL_OFF", "0");
        std::env::remove_var("LAZYCACHE_TEST_BOOL_MISSING");

        assert!(env_bool("LAZYCACHE_TEST_BOOL_ON", false));
        assert!(!env_bool("LAZYCACHE_TEST_BOOL_OFF", true));
        assert!(env_bool("LAZYCACHE_TEST_BOOL_MISSING", true));

        std::env::remove_var("LAZYCACHE_TEST_BOOL_ON");
        std::env::remove_var("LAZYCACHE_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_STORE_KIND, "file");
        std::env::set_var(ENV_STORE_PATH, "/tmp/lazycache/snapshot.json");
        std::env::set_var(ENV_WORKER_THREADS, "3");
        std::env::set_var(ENV_MAX_BLOCKING_THREADS, "8");
        std::env::set_var(ENV_LOG_FILTER, "lazycache=debug");
        std::env::set_var(ENV_LOG_JSON, "yes");

        let result = load_from_env();
        clear_env();

        let config = result.expect("env config");
        assert_eq!(config.store.kind, StoreKind::File);
        assert_eq!(config.store.path, Some(PathBuf::from("/tmp/lazycache/snapshot.json")));
        assert_eq!(config.workers.worker_threads, 3);
        assert_eq!(config.workers.max_blocking_threads, 8);
        assert_eq!(config.logging.filter, "lazycache=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_env_optional_vars_default() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_STORE_KIND, "memory");

        let result = load_from_env();
        clear_env();

        let config = result.expect("env config");
        assert_eq!(config.store.kind, StoreKind::Memory);
        assert_eq!(config.workers.worker_threads, DEFAULT_WORKER_THREADS);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_from_env_missing_kind() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, CacheError::Config(ref msg) if msg.contains(ENV_STORE_KIND)));
    }

    #[test]
    fn test_load_from_env_invalid_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_STORE_KIND, "sqlite");
        assert!(matches!(load_from_env(), Err(CacheError::Config(_))));

        std::env::set_var(ENV_STORE_KIND, "memory");
        std::env::set_var(ENV_WORKER_THREADS, "many");
        assert!(matches!(load_from_env(), Err(CacheError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_rejects_invalid_env_config() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_STORE_KIND, "file");

        let result = load();
        clear_env();

        assert!(matches!(result, Err(CacheError::Config(ref msg)) if msg.contains("store.path")));
    }

    #[test]
    fn test_load_from_file_json() {
        let path = temp_config(
            r#"{
                "workers": { "max_blocking_threads": 4 },
                "store": { "kind": "file", "path": "cache/snapshot.json" }
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).expect("json config");
        assert_eq!(config.workers.max_blocking_threads, 4);
        assert_eq!(config.workers.worker_threads, DEFAULT_WORKER_THREADS);
        assert_eq!(config.store.kind, StoreKind::File);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = temp_config(
            r#"
[logging]
filter = "warn"
json = true
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).expect("toml config");
        assert_eq!(config.logging.filter, "warn");
        assert!(config.logging.json);
        assert_eq!(config.store.kind, StoreKind::Memory);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/lazycache.json"))).unwrap_err();
        assert!(matches!(err, CacheError::Config(_)));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let path = temp_config(r#"{ "store": { "kind": "#, "json");

        let err = load_from_file(Some(path.clone())).unwrap_err();
        assert!(matches!(err, CacheError::Config(ref msg) if msg.starts_with("Invalid JSON")));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("kind: memory", Path::new("lazycache.yaml"));
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_parse_config_empty_toml_is_default() {
        let config = parse_config("", Path::new("lazycache.toml")).unwrap();
        assert_eq!(config, CacheConfig::default());
    }
}
