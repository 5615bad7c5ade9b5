//! Tests for image ingestion, derived variants and image removal.

use atelier_assets::{AssetStore, ImageStore, InMemoryAssetRepository, KeyedLocker, ScratchDir};
use atelier_core::{BlobKey, Entity, Image};
use atelier_error::AssetErrorKind;
use atelier_interface::Locker;
use atelier_transport::{MemoryTransport, TransportOp, TransportRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    scratch: PathBuf,
    images: ImageStore,
    transport: MemoryTransport,
    repository: InMemoryAssetRepository,
    locker: Arc<KeyedLocker>,
}

fn setup() -> Fixture {
    let dir = TempDir::new().unwrap();
    let scratch = dir.path().join("tmp");
    let transport = MemoryTransport::new("/media");
    let mut registry = TransportRegistry::new(Some("memory"));
    registry.register("memory", Arc::new(transport.clone()));
    let repository = InMemoryAssetRepository::new();
    let assets = AssetStore::new(
        Arc::new(registry),
        Arc::new(repository.clone()),
        ScratchDir::new(&scratch),
    );
    let locker = Arc::new(KeyedLocker::new(Duration::from_secs(5)));
    let images = ImageStore::new(assets, locker.clone());
    Fixture {
        _dir: dir,
        scratch,
        images,
        transport,
        repository,
        locker,
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(pixels)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

async fn ingested(fixture: &Fixture) -> Image {
    let mut image = Image::default();
    fixture
        .images
        .from_buffer(&mut image, &png(16, 8), "cat.bin")
        .await
        .unwrap();
    image
}

fn source_path(fixture: &Fixture, image: &Image) -> PathBuf {
    fixture.scratch.join(image.asset().hash().unwrap())
}

async fn wait_for_removal(path: &PathBuf) {
    for _ in 0..100 {
        if !path.exists() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{} was never removed", path.display());
}

#[tokio::test]
async fn test_ingestion_records_detected_format() {
    let fixture = setup();
    let image = ingested(&fixture).await;

    assert_eq!(image.asset().ext(), Some("png"));
    let meta = image.meta().unwrap();
    assert_eq!(meta.format(), "png");
    assert_eq!(*meta.width(), 16);
    assert_eq!(*meta.height(), 8);
    assert_eq!(meta.color(), "Rgba8");
    assert!(image.thumbs().is_empty());

    let key = BlobKey::primary(image.asset()).unwrap();
    assert!(key.as_str().ends_with(".png"));
    assert!(fixture.transport.get(key.as_str()).await.is_some());
}

#[tokio::test]
async fn test_undecodable_input_is_rejected_before_storage() {
    let fixture = setup();

    let mut image = Image::default();
    let err = fixture
        .images
        .from_buffer(&mut image, b"definitely not pixels", "fake.png")
        .await
        .unwrap_err();

    assert!(matches!(err.asset_kind(), Some(AssetErrorKind::DecodeFailure(_))));
    assert!(fixture.transport.calls().await.is_empty());
    assert!(fixture.repository.is_empty().await);
}

#[tokio::test]
async fn test_commit_registers_variant() {
    let fixture = setup();
    let mut image = ingested(&fixture).await;

    let mut handle = fixture.images.thumb(&image, "small").await.unwrap();
    handle.thumbnail(4, 4);
    let thumb = handle.commit(&mut image).await.unwrap();

    assert_eq!(thumb.name(), "small");
    assert_eq!(thumb.ext(), "png");
    assert_eq!(*thumb.meta().width(), 4);
    assert_eq!(*thumb.meta().height(), 2);
    assert_eq!(image.thumb("small"), Some(&thumb));

    let key = format!("{}-small", image.asset().hash().unwrap());
    assert!(fixture.transport.get(&key).await.is_some());

    let reloaded: Image = fixture
        .images
        .assets()
        .load(image.asset().id().unwrap())
        .await
        .unwrap();
    assert_eq!(reloaded.thumb("small"), Some(&thumb));
    assert!(!source_path(&fixture, &image).exists());
}

#[tokio::test]
async fn test_concurrent_variants_fetch_source_once() {
    let fixture = setup();
    let mut image = ingested(&fixture).await;
    let source = source_path(&fixture, &image);
    let pushes = fixture.transport.count(TransportOp::Push).await;

    let (small, large) = tokio::join!(
        fixture.images.thumb(&image, "small"),
        fixture.images.thumb(&image, "large"),
    );
    let (mut small, mut large) = (small.unwrap(), large.unwrap());
    assert_eq!(fixture.transport.count(TransportOp::Pull).await, 1);
    assert!(source.exists());

    small.thumbnail(4, 4);
    small.commit(&mut image).await.unwrap();
    assert!(source.exists());

    large.resize_exact(12, 6);
    large.commit(&mut image).await.unwrap();
    assert!(!source.exists());

    assert_eq!(fixture.transport.count(TransportOp::Pull).await, 1);
    assert_eq!(fixture.transport.count(TransportOp::Push).await, pushes + 2);
    assert_eq!(image.thumbs().len(), 2);
    let hash = image.asset().hash().unwrap();
    for variant in ["small", "large"] {
        let key = format!("{}-{}", hash, variant);
        assert!(fixture.transport.get(&key).await.is_some(), "missing {}", key);
    }

    fixture.images.thumb(&image, "again").await.unwrap();
    assert_eq!(fixture.transport.count(TransportOp::Pull).await, 2);
}

#[tokio::test]
async fn test_dropped_handle_releases_source() {
    let fixture = setup();
    let image = ingested(&fixture).await;
    let source = source_path(&fixture, &image);

    let handle = fixture.images.thumb(&image, "abandoned").await.unwrap();
    assert!(source.exists());
    drop(handle);

    wait_for_removal(&source).await;
    assert!(image.thumbs().is_empty());
}

#[tokio::test]
async fn test_abandoned_commit_still_releases_source() {
    let fixture = setup();
    let mut image = ingested(&fixture).await;
    let source = source_path(&fixture, &image);
    let id = image.asset().id().unwrap();

    let mut handle = fixture.images.thumb(&image, "small").await.unwrap();
    handle.thumbnail(4, 4);

    // Keep the download lock so the commit stalls while releasing its claim.
    let guard = fixture
        .locker
        .lock(&format!("{}:downloading", id))
        .await
        .unwrap();
    let commit = tokio::time::timeout(Duration::from_millis(200), handle.commit(&mut image)).await;
    assert!(commit.is_err());
    assert!(source.exists());
    guard.release();

    wait_for_removal(&source).await;

    let mut large = fixture.images.thumb(&image, "large").await.unwrap();
    assert_eq!(fixture.transport.count(TransportOp::Pull).await, 2);
    large.thumbnail(8, 8);
    large.commit(&mut image).await.unwrap();
    assert!(!source.exists());
}

#[tokio::test]
async fn test_undecodable_source_releases_lease() {
    let fixture = setup();
    let mut image = Image::default();
    fixture
        .images
        .assets()
        .from_buffer(&mut image, b"not an image", "broken.png")
        .await
        .unwrap();
    let source = source_path(&fixture, &image);

    let err = fixture.images.thumb(&image, "small").await.unwrap_err();
    assert!(matches!(err.asset_kind(), Some(AssetErrorKind::DecodeFailure(_))));
    assert!(!source.exists());

    fixture.images.thumb(&image, "small").await.unwrap_err();
    assert_eq!(fixture.transport.count(TransportOp::Pull).await, 2);
}

#[tokio::test]
async fn test_invalid_variant_names_are_rejected() {
    let fixture = setup();
    let image = ingested(&fixture).await;

    for name in ["", "../etc", "a/b", "with space"] {
        let err = fixture.images.thumb(&image, name).await.unwrap_err();
        assert!(matches!(err.asset_kind(), Some(AssetErrorKind::InvalidVariant(_))));
    }
    assert_eq!(fixture.transport.count(TransportOp::Pull).await, 0);
}

#[tokio::test]
async fn test_unsaved_image_has_no_variants() {
    let fixture = setup();
    let err = fixture
        .images
        .thumb(&Image::default(), "small")
        .await
        .unwrap_err();
    assert!(matches!(err.asset_kind(), Some(AssetErrorKind::NotPersisted)));
}

#[tokio::test]
async fn test_handle_cannot_commit_to_another_image() {
    let fixture = setup();
    let first = ingested(&fixture).await;
    let mut second = ingested(&fixture).await;

    let handle = fixture.images.thumb(&first, "small").await.unwrap();
    let err = handle.commit(&mut second).await.unwrap_err();

    assert!(matches!(err.asset_kind(), Some(AssetErrorKind::WrongAsset(_))));
    assert!(second.thumbs().is_empty());
    assert!(!source_path(&fixture, &first).exists());
}

#[tokio::test]
async fn test_remove_continues_past_failing_variant() {
    let fixture = setup();
    let mut image = ingested(&fixture).await;
    for name in ["small", "large"] {
        let handle = fixture.images.thumb(&image, name).await.unwrap();
        handle.commit(&mut image).await.unwrap();
    }
    let hash = image.asset().hash().unwrap().to_string();
    fixture.transport.fail_on(format!("{}-small", hash)).await;

    let report = fixture.images.remove(&image).await.unwrap();

    let failures: Vec<_> = report.failures().map(|o| o.target().clone()).collect();
    assert_eq!(failures, [format!("{}-small", hash)]);
    assert!(report.record_removed());
    assert!(fixture.repository.is_empty().await);
    assert_eq!(fixture.transport.keys().await, [format!("{}-small", hash)]);
    assert_eq!(fixture.transport.count(TransportOp::Remove).await, 3);
}

#[tokio::test]
async fn test_sanitise_lists_variants_with_urls() {
    let fixture = setup();
    let mut image = ingested(&fixture).await;
    let handle = fixture.images.thumb(&image, "small").await.unwrap();
    handle.commit(&mut image).await.unwrap();
    let hash = image.asset().hash().unwrap().to_string();

    let out = fixture.images.sanitise(&image).await.unwrap();

    assert_eq!(out["url"], format!("/media/{}.png", hash));
    assert_eq!(out["thumbs"]["small"]["url"], format!("/media/{}-small", hash));
    assert_eq!(out["thumbs"]["small"]["ext"], "png");

    let err = fixture
        .images
        .registered_url(&image, "large")
        .await
        .unwrap_err();
    assert!(matches!(err.asset_kind(), Some(AssetErrorKind::UnknownVariant(_))));
    assert_eq!(
        fixture.images.registered_url(&image, "small").await.unwrap(),
        format!("/media/{}-small", hash)
    );
}
