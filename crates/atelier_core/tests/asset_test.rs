//! Tests for asset records and canonical keys.

use atelier_core::{Asset, AssetKind, BlobKey, Entity, Image, ImageMeta, Thumb};

#[test]
fn test_write_once_fields() {
    let mut asset = Asset::default();

    asset.ensure_ext("first.PNG");
    asset.ensure_ext("second.jpg");
    assert_eq!(asset.ext(), Some("png"));

    let hash = asset.ensure_hash().to_string();
    assert_eq!(asset.ensure_hash(), hash);

    asset.ensure_transport("local");
    asset.ensure_transport("http");
    assert_eq!(asset.transport(), Some("local"));

}

#[test]
fn test_supplied_name_replaces_previous() {
    let mut asset = Asset::default();
    asset.ensure_ext("first.PNG");

    asset.set_name(Some("first.PNG"));
    asset.set_name(None);
    assert_eq!(asset.name(), Some("first.PNG"));

    asset.set_name(Some("renamed.png"));
    assert_eq!(asset.name(), Some("renamed.png"));
}

#[test]
fn test_name_defaults_to_hash_and_ext() {
    let mut asset = Asset::default();
    asset.ensure_ext("upload.webp");
    asset.set_name(None);

    let hash = asset.hash().unwrap().to_string();
    assert_eq!(asset.name().unwrap(), format!("{}.webp", hash));
}

#[test]
fn test_name_without_extension() {
    let mut asset = Asset::default();
    asset.ensure_ext("Makefile");
    asset.set_name(Some(""));

    assert_eq!(asset.name(), asset.hash());
}

#[test]
fn test_primary_key_requires_hash() {
    let asset = Asset::default();
    let err = BlobKey::primary(&asset).unwrap_err();
    assert!(format!("{}", err).contains("not been persisted"));
}

#[test]
fn test_variant_key_rejects_path_segments() {
    let mut asset = Asset::default();
    asset.ensure_hash();

    assert!(BlobKey::variant(&asset, "a/b").is_err());
    assert!(BlobKey::variant(&asset, "..").is_err());
    assert!(BlobKey::for_asset(&asset, Some("thumb-2x")).is_ok());
}

#[test]
fn test_image_serializes_flat() {
    let mut image = Image::default();
    image.asset_mut().ensure_ext("cat.png");
    image.asset_mut().ensure_hash();
    image.set_meta(ImageMeta::new("png", 4, 3, "Rgba8", 120));
    image.insert_thumb(Thumb::new(
        "small",
        "png",
        ImageMeta::new("png", 2, 1, "Rgba8", 60),
    ));

    let value = serde_json::to_value(&image).unwrap();
    assert_eq!(value["ext"], "png");
    assert_eq!(value["meta"]["width"], 4);
    assert_eq!(value["thumbs"]["small"]["name"], "small");

    let back: Image = serde_json::from_value(value).unwrap();
    assert_eq!(back, image);
    assert_eq!(Image::KIND, AssetKind::Image);
}

#[test]
fn test_kind_parses_from_str() {
    let kind: AssetKind = "image".parse().unwrap();
    assert_eq!(kind, AssetKind::Image);
    assert_eq!(AssetKind::File.to_string(), "file");
}
