//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;
use std::path::PathBuf;

use lazycache_domain::{CacheConfig, CacheError, StoreKind};
use lazycache_infra::config;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "workers": {
                "worker_threads": 4,
                "max_blocking_threads": 12,
                "thread_name": "cache-io"
            },
            "store": {
                "kind": "file",
                "path": "/var/lib/lazycache/snapshot.json"
            },
            "logging": {
                "filter": "lazycache=trace",
                "json": true
            }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("JSON config should load");

    assert_eq!(config.workers.worker_threads, 4);
    assert_eq!(config.workers.max_blocking_threads, 12);
    assert_eq!(config.workers.thread_name, "cache-io");
    assert_eq!(config.store.kind, StoreKind::File);
    assert_eq!(config.store.path, Some(PathBuf::from("/var/lib/lazycache/snapshot.json")));
    assert_eq!(config.logging.filter, "lazycache=trace");
    assert!(config.logging.json);
    assert!(config.validate().is_ok());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let path = write_config(
        r#"
[workers]
worker_threads = 1

[store]
kind = "memory"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("TOML config should load");

    assert_eq!(config.workers.worker_threads, 1);
    assert_eq!(config.store.kind, StoreKind::Memory);
    assert_eq!(config.logging, CacheConfig::default().logging);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_file_store_without_path_parses_but_fails_validation() {
    let path = write_config(r#"{ "store": { "kind": "file" } }"#, "json");

    let config = config::load_from_file(Some(path.clone())).expect("config should parse");
    assert!(matches!(config.validate(), Err(CacheError::Config(_))));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/lazycache.json".into()));

    match result {
        Err(CacheError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_with_invalid_format() {
    let path = write_config(r#"{ "workers": "not an object" }"#, "json");

    match config::load_from_file(Some(path.clone())) {
        Err(CacheError::Config(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }

    std::fs::remove_file(path).ok();
}
