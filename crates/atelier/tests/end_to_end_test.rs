//! Full lifecycle against the local transport and file records.

use atelier::{Atelier, AtelierConfig, Entity, Image, JsonFileRepository, TransportConfig};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn config(root: &Path) -> AtelierConfig {
    let mut transports = HashMap::new();
    transports.insert(
        "local".to_string(),
        TransportConfig::Local {
            directory: root.join("media"),
            url_prefix: "/media".to_string(),
        },
    );
    AtelierConfig {
        scratch_dir: root.join("tmp"),
        records_dir: root.join("records"),
        transports,
        ..Default::default()
    }
}

fn open(config: &AtelierConfig) -> Atelier {
    let repository = Arc::new(JsonFileRepository::new(&config.records_dir).unwrap());
    Atelier::new(config, repository).unwrap()
}

fn write_png(path: &Path) {
    image::RgbImage::from_pixel(20, 10, image::Rgb([0, 128, 255]))
        .save(path)
        .unwrap();
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_image_lifecycle() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    let atelier = open(&config);

    let upload = dir.path().join("holiday.png");
    write_png(&upload);

    let mut image = Image::default();
    atelier
        .images()
        .from_file(&mut image, &upload, None)
        .await
        .unwrap();
    let id = image.asset().id().unwrap();
    let hash = image.asset().hash().unwrap().to_string();
    assert!(dir.path().join("media").join(format!("{}.png", hash)).is_file());
    assert!(upload.is_file());

    let mut handle = atelier.images().thumb(&image, "small").await.unwrap();
    handle.thumbnail(10, 10);
    handle.commit(&mut image).await.unwrap();
    assert!(dir.path().join("media").join(format!("{}-small", hash)).is_file());
    assert_eq!(file_count(&dir.path().join("tmp")), 0);

    // A fresh process sees the committed variant.
    let reopened = open(&config);
    let loaded: Image = reopened.assets().load(id).await.unwrap();
    assert_eq!(*loaded.thumb("small").unwrap().meta().width(), 10);
    assert_eq!(
        reopened.images().registered_url(&loaded, "small").await.unwrap(),
        format!("/media/{}-small", hash)
    );

    let report = reopened.images().remove(&loaded).await.unwrap();
    assert!(report.is_clean());
    assert_eq!(report.outcomes().len(), 2);
    assert_eq!(file_count(&dir.path().join("media")), 0);
    assert_eq!(file_count(&dir.path().join("records")), 0);
}
