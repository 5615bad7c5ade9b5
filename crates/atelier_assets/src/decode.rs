//! Image decoding and metadata extraction.

use atelier_core::ImageMeta;
use atelier_error::{AssetError, AssetErrorKind, AtelierResult};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Canonical file extension for a decoded format.
pub fn extension_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        ImageFormat::Bmp => "bmp",
        other => other.extensions_str().first().copied().unwrap_or("bin"),
    }
}

/// Decode `bytes`, returning the pixels and the detected format.
pub(crate) fn decode(bytes: &[u8]) -> AtelierResult<(DynamicImage, ImageFormat)> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AssetError::new(AssetErrorKind::DecodeFailure(e.to_string())))?;
    let format = reader.format().ok_or_else(|| {
        AssetError::new(AssetErrorKind::DecodeFailure(
            "unrecognised image format".to_string(),
        ))
    })?;
    let image = reader
        .decode()
        .map_err(|e| AssetError::new(AssetErrorKind::DecodeFailure(e.to_string())))?;
    Ok((image, format))
}

pub(crate) fn meta_of(image: &DynamicImage, format: ImageFormat, size: u64) -> ImageMeta {
    ImageMeta::new(
        extension_for(format),
        image.width(),
        image.height(),
        format!("{:?}", image.color()),
        size,
    )
}

/// Decode `bytes` and describe them.
///
/// # Errors
///
/// `DecodeFailure` when the bytes are not an image in a supported format.
///
/// # Examples
///
/// ```
/// let err = atelier_assets::decode_meta(b"plain text").unwrap_err();
/// assert!(format!("{}", err).contains("decode"));
/// ```
pub fn decode_meta(bytes: &[u8]) -> AtelierResult<ImageMeta> {
    let (image, format) = decode(bytes)?;
    Ok(meta_of(&image, format, bytes.len() as u64))
}

/// Run [`decode_meta`] off the async runtime.
pub(crate) async fn decode_meta_blocking(bytes: Vec<u8>) -> AtelierResult<ImageMeta> {
    tokio::task::spawn_blocking(move || decode_meta(&bytes))
        .await
        .map_err(|e| AssetError::new(AssetErrorKind::DecodeFailure(e.to_string())))?
}

/// Run [`decode`] off the async runtime.
pub(crate) async fn decode_blocking(bytes: Vec<u8>) -> AtelierResult<(DynamicImage, ImageFormat)> {
    tokio::task::spawn_blocking(move || decode(&bytes))
        .await
        .map_err(|e| AssetError::new(AssetErrorKind::DecodeFailure(e.to_string())))?
}

/// Encode `image` as `format`, returning the bytes and their metadata.
pub(crate) async fn encode_blocking(
    image: DynamicImage,
    format: ImageFormat,
) -> AtelierResult<(Vec<u8>, ImageMeta)> {
    tokio::task::spawn_blocking(move || {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .map_err(|e| {
                AssetError::new(AssetErrorKind::DecodeFailure(format!(
                    "encode {}: {}",
                    extension_for(format),
                    e
                )))
            })?;
        let meta = meta_of(&image, format, bytes.len() as u64);
        Ok((bytes, meta))
    })
    .await
    .map_err(|e| AssetError::new(AssetErrorKind::DecodeFailure(e.to_string())))?
}
