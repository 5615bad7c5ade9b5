//! Tests for the HTTP object-store transport against an in-process server.

use atelier_core::{Asset, BlobKey};
use atelier_transport::{HttpTransport, Transport};
use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::RwLock;

type Objects = Arc<RwLock<HashMap<String, Bytes>>>;

const TOKEN: &str = "secret";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

async fn put_object(
    State(objects): State<Objects>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    objects.write().await.insert(key, body);
    StatusCode::CREATED
}

async fn get_object(
    State(objects): State<Objects>,
    Path(key): Path<String>,
) -> Result<Bytes, StatusCode> {
    objects
        .read()
        .await
        .get(&key)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_object(State(objects): State<Objects>, Path(key): Path<String>) -> StatusCode {
    match objects.write().await.remove(&key) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn spawn_store() -> (String, Objects) {
    let objects: Objects = Arc::new(RwLock::new(HashMap::new()));
    let app = Router::new()
        .route(
            "/bucket/*key",
            get(get_object).put(put_object).delete(delete_object),
        )
        .with_state(objects.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/bucket", addr), objects)
}

fn asset() -> Asset {
    let mut asset = Asset::default();
    asset.ensure_ext("doc.pdf");
    asset.ensure_hash();
    asset
}

#[tokio::test]
async fn test_round_trip_through_store() {
    let (endpoint, objects) = spawn_store().await;
    let transport = HttpTransport::new(
        endpoint,
        Some("https://cdn.example.com/assets/".to_string()),
        Some(TOKEN.to_string()),
        Duration::from_secs(5),
    )
    .unwrap();

    let work = TempDir::new().unwrap();
    let source = work.path().join("doc.pdf");
    tokio::fs::write(&source, b"%PDF-1.7").await.unwrap();

    let asset = asset();
    let key = BlobKey::primary(&asset).unwrap();
    transport.push(&key, &source).await.unwrap();
    assert!(objects.read().await.contains_key(key.as_str()));
    assert!(transport.exists(&key).await.unwrap());

    let dest = work.path().join("copy/doc.pdf");
    transport.pull(&key, &dest).await.unwrap();
    assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"%PDF-1.7");

    assert_eq!(
        transport.url(&key).await.unwrap(),
        format!("https://cdn.example.com/assets/{}", key)
    );

    transport.remove(&key).await.unwrap();
    assert!(!transport.exists(&key).await.unwrap());
}

#[tokio::test]
async fn test_missing_object_is_not_found() {
    let (endpoint, _objects) = spawn_store().await;
    let transport =
        HttpTransport::new(endpoint, None, Some(TOKEN.to_string()), Duration::from_secs(5)).unwrap();

    let work = TempDir::new().unwrap();
    let key = BlobKey::variant(&asset(), "small").unwrap();

    assert!(transport.pull(&key, &work.path().join("x")).await.unwrap_err().is_not_found());
    assert!(transport.remove(&key).await.unwrap_err().is_not_found());
    assert!(!work.path().join("x").exists());
}

#[tokio::test]
async fn test_rejected_push_is_failure() {
    let (endpoint, objects) = spawn_store().await;
    let transport = HttpTransport::new(endpoint, None, None, Duration::from_secs(5)).unwrap();

    let work = TempDir::new().unwrap();
    let source = work.path().join("doc.pdf");
    tokio::fs::write(&source, b"data").await.unwrap();

    let key = BlobKey::primary(&asset()).unwrap();
    let err = transport.push(&key, &source).await.unwrap_err();
    assert!(!err.is_not_found());
    assert!(format!("{}", err).contains("401"));
    assert!(objects.read().await.is_empty());
}

#[test]
fn test_rejects_non_http_endpoint() {
    let result = HttpTransport::new("ftp://files.example.com", None, None, Duration::from_secs(5));
    assert!(result.is_err());
}
