//! Tests for configuration loading.

use atelier::{AtelierConfig, TransportConfig};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = AtelierConfig::default();
    assert_eq!(config.default_transport, "local");
    assert_eq!(config.scratch_dir, PathBuf::from("data/cache/tmp"));
    assert_eq!(config.records_dir, PathBuf::from("data/records"));
    assert_eq!(config.lock_timeout(), Duration::from_secs(30));
    assert!(!config.json_logs);
}

#[test]
fn test_empty_file_keeps_bundled_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "").unwrap();

    let config = AtelierConfig::from_file(&path).unwrap();

    assert_eq!(config.default_transport, "local");
    assert_eq!(config.lock_timeout_ms, 30_000);
    assert_eq!(config.transports["local"], TransportConfig::fallback_local());
}

#[test]
fn test_file_overrides_and_adds_transports() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("atelier.toml");
    std::fs::write(
        &path,
        format!(
            r#"
default_transport = "disk"
lock_timeout_ms = 250
json_logs = true

[transports.local]
kind = "local"
directory = "{root}/local"
url_prefix = "/media"

[transports.disk]
kind = "local"
directory = "{root}/disk"
url_prefix = "/files"

[transports.bucket]
kind = "http"
endpoint = "https://objects.example.com/media"
timeout_secs = 5
"#,
            root = dir.path().display()
        ),
    )
    .unwrap();

    let config = AtelierConfig::from_file(&path).unwrap();

    assert_eq!(config.default_transport, "disk");
    assert_eq!(config.lock_timeout(), Duration::from_millis(250));
    assert!(config.json_logs);
    assert!(matches!(
        config.transports["bucket"],
        TransportConfig::Http { timeout_secs: 5, .. }
    ));

    let registry = config.registry().unwrap();
    assert_eq!(registry.names(), vec!["bucket", "disk", "local"]);
    assert_eq!(registry.resolve_name(None), "disk");
    assert!(dir.path().join("disk").is_dir());
}

#[test]
fn test_missing_file_is_a_config_error() {
    let err = AtelierConfig::from_file("/definitely/not/here.toml").unwrap_err();
    assert!(format!("{}", err).contains("Failed to read configuration"));
}
