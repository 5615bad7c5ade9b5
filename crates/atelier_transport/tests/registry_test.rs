//! Tests for transport configuration and the registry.

use atelier_transport::{FALLBACK_TRANSPORT, TransportConfig, TransportRegistry};
use std::collections::HashMap;
use tempfile::TempDir;

#[test]
fn test_config_deserializes_tagged_variants() {
    let json = serde_json::json!({
        "disk": { "kind": "local", "directory": "/srv/media" },
        "bucket": { "kind": "http", "endpoint": "https://objects.internal/a", "timeout_secs": 5 },
        "scratch": { "kind": "memory" }
    });
    let configs: HashMap<String, TransportConfig> = serde_json::from_value(json).unwrap();

    assert_eq!(
        configs["disk"],
        TransportConfig::Local {
            directory: "/srv/media".into(),
            url_prefix: "/media".to_string(),
        }
    );
    assert!(matches!(
        configs["bucket"],
        TransportConfig::Http { timeout_secs: 5, public_url: None, .. }
    ));
    assert!(matches!(configs["scratch"], TransportConfig::Memory { .. }));
}

#[test]
fn test_from_configs_builds_each_backend() {
    let dir = TempDir::new().unwrap();
    let mut configs = HashMap::new();
    configs.insert(
        FALLBACK_TRANSPORT.to_string(),
        TransportConfig::Local {
            directory: dir.path().to_path_buf(),
            url_prefix: "/files".to_string(),
        },
    );
    configs.insert(
        "scratch".to_string(),
        TransportConfig::Memory {
            url_prefix: "/mem".to_string(),
        },
    );

    let registry = TransportRegistry::from_configs(&configs, Some("scratch")).unwrap();

    assert_eq!(registry.names(), vec!["local", "scratch"]);
    assert_eq!(registry.get("local").unwrap().backend(), "local");
    assert_eq!(registry.get("scratch").unwrap().backend(), "memory");
    assert_eq!(registry.resolve_name(None), "scratch");
}

#[test]
fn test_resolution_order() {
    let registry = TransportRegistry::new(None);
    assert_eq!(registry.resolve_name(None), FALLBACK_TRANSPORT);
    assert_eq!(registry.resolve_name(Some("bucket")), "bucket");

    let registry = TransportRegistry::new(Some("bucket"));
    assert_eq!(registry.resolve_name(None), "bucket");
    assert_eq!(registry.resolve_name(Some("local")), "local");
}

#[test]
fn test_unknown_transport() {
    let registry = TransportRegistry::new(None);
    let err = registry.get("gcs").err().unwrap();
    assert!(format!("{}", err).contains("Unknown transport"));
}
