//! Tests for the filesystem transport.

use atelier_core::{Asset, BlobKey};
use atelier_transport::{LocalTransport, Transport};
use tempfile::TempDir;

fn asset(name: &str) -> Asset {
    let mut asset = Asset::default();
    asset.ensure_ext(name);
    asset.ensure_hash();
    asset
}

async fn source_file(dir: &TempDir, data: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join("upload.bin");
    tokio::fs::write(&path, data).await.unwrap();
    path
}

#[tokio::test]
async fn test_push_and_pull() {
    let store_dir = TempDir::new().unwrap();
    let work_dir = TempDir::new().unwrap();
    let transport = LocalTransport::new(store_dir.path(), "/media").unwrap();

    let asset = asset("photo.png");
    let key = BlobKey::primary(&asset).unwrap();
    let source = source_file(&work_dir, b"Hello, world!").await;

    transport.push(&key, &source).await.unwrap();
    assert!(transport.exists(&key).await.unwrap());
    assert!(store_dir.path().join(key.as_str()).exists());

    let dest = work_dir.path().join("nested/pulled.png");
    transport.pull(&key, &dest).await.unwrap();
    assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"Hello, world!");
}

#[tokio::test]
async fn test_push_leaves_no_temp_files() {
    let store_dir = TempDir::new().unwrap();
    let work_dir = TempDir::new().unwrap();
    let transport = LocalTransport::new(store_dir.path(), "/media").unwrap();

    let asset = asset("a.txt");
    let key = BlobKey::primary(&asset).unwrap();
    let source = source_file(&work_dir, b"first").await;
    transport.push(&key, &source).await.unwrap();
    let source = source_file(&work_dir, b"second").await;
    transport.push(&key, &source).await.unwrap();

    let mut entries = tokio::fs::read_dir(store_dir.path()).await.unwrap();
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name().to_string_lossy().to_string());
    }
    assert_eq!(names, vec![key.as_str().to_string()]);

    let dest = work_dir.path().join("out");
    transport.pull(&key, &dest).await.unwrap();
    assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"second");
}

#[tokio::test]
async fn test_remove() {
    let store_dir = TempDir::new().unwrap();
    let work_dir = TempDir::new().unwrap();
    let transport = LocalTransport::new(store_dir.path(), "/media").unwrap();

    let asset = asset("delete.me");
    let key = BlobKey::variant(&asset, "small").unwrap();
    let source = source_file(&work_dir, b"Delete me").await;

    transport.push(&key, &source).await.unwrap();
    transport.remove(&key).await.unwrap();
    assert!(!transport.exists(&key).await.unwrap());

    let err = transport.remove(&key).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_pull_missing_is_not_found() {
    let store_dir = TempDir::new().unwrap();
    let work_dir = TempDir::new().unwrap();
    let transport = LocalTransport::new(store_dir.path(), "/media").unwrap();

    let key = BlobKey::primary(&asset("ghost.png")).unwrap();
    let err = transport
        .pull(&key, &work_dir.path().join("ghost.png"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_url_uses_prefix() {
    let store_dir = TempDir::new().unwrap();
    let transport = LocalTransport::new(store_dir.path(), "/static/media/").unwrap();

    let asset = asset("cat.jpeg");
    let key = BlobKey::primary(&asset).unwrap();
    let url = transport.url(&key).await.unwrap();

    assert_eq!(url, format!("/static/media/{}.jpeg", asset.hash().unwrap()));
}

#[tokio::test]
async fn test_tmp_extension_round_trip() {
    let store_dir = TempDir::new().unwrap();
    let work_dir = TempDir::new().unwrap();
    let transport = LocalTransport::new(store_dir.path(), "/media").unwrap();

    let asset = asset("backup.tmp");
    let key = BlobKey::primary(&asset).unwrap();
    assert!(key.as_str().ends_with(".tmp"));
    let source = source_file(&work_dir, b"session state").await;

    transport.push(&key, &source).await.unwrap();
    assert!(transport.exists(&key).await.unwrap());

    let dest = work_dir.path().join("restored.tmp");
    transport.pull(&key, &dest).await.unwrap();
    assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"session state");

    transport.remove(&key).await.unwrap();
    assert!(!transport.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_rejects_unsafe_keys() {
    let store_dir = TempDir::new().unwrap();
    let transport = LocalTransport::new(store_dir.path(), "/media").unwrap();

    // Records loaded from storage are not trusted to carry a clean hash
    let asset: Asset = serde_json::from_value(serde_json::json!({
        "hash": ".hidden",
        "ext": "png",
    }))
    .unwrap();
    let key = BlobKey::primary(&asset).unwrap();

    let err = transport.exists(&key).await.unwrap_err();
    assert!(format!("{}", err).contains("Invalid key"));
}
