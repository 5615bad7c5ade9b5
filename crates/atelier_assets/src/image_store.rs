//! Image ingestion and derived variants.

use crate::debounce::{SourceDebounce, SourceLease, lock_key};
use crate::decode::{decode_blocking, decode_meta_blocking};
use crate::{AssetStore, RemovalReport, Sanitised, VariantHandle};
use atelier_core::{BlobKey, Entity, Image, ImageMeta, validate_variant};
use atelier_error::{AssetError, AssetErrorKind, AtelierResult, JsonError};
use atelier_interface::{HookEvent, Locker};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

/// Lifecycle service for images.
///
/// Wraps an [`AssetStore`]: every ingestion path decodes the bytes first,
/// replaces the extension with the detected format and records
/// [`ImageMeta`], then runs the shared ingestion routine. Undecodable input
/// fails with `DecodeFailure` before anything is pushed or saved.
#[derive(Debug, Clone)]
pub struct ImageStore {
    assets: AssetStore,
    debounce: Arc<SourceDebounce>,
}

impl ImageStore {
    /// Image store over `assets`, using `locker` to coordinate variant
    /// requests on the same image.
    pub fn new(assets: AssetStore, locker: Arc<dyn Locker>) -> Self {
        Self {
            assets,
            debounce: Arc::new(SourceDebounce::new(locker)),
        }
    }

    /// The underlying file store.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    fn apply_meta(image: &mut Image, meta: ImageMeta) {
        image.asset_mut().override_ext(meta.format());
        image.set_meta(meta);
    }

    /// Decode and ingest the image at `path`.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing path, `DecodeFailure` for bytes that are not
    /// an image. Neither makes any transport or persistence call.
    pub async fn from_file(&self, image: &mut Image, path: &Path, name: Option<&str>) -> AtelierResult<()> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetError::new(AssetErrorKind::NotFound(path.display().to_string()))
            } else {
                AssetError::io(path.display(), e)
            }
        })?;
        let meta = decode_meta_blocking(bytes).await?;
        Self::apply_meta(image, meta);
        self.assets.from_file(image, path, name).await
    }

    /// Alias of [`from_file`](Self::from_file).
    pub async fn file(&self, image: &mut Image, path: &Path, name: Option<&str>) -> AtelierResult<()> {
        self.from_file(image, path, name).await
    }

    /// Decode and ingest in-memory bytes.
    pub async fn from_buffer(&self, image: &mut Image, bytes: &[u8], name: &str) -> AtelierResult<()> {
        let meta = decode_meta_blocking(bytes.to_vec()).await?;
        Self::apply_meta(image, meta);
        self.assets.from_buffer(image, bytes, name).await
    }

    /// Alias of [`from_buffer`](Self::from_buffer).
    pub async fn buffer(&self, image: &mut Image, bytes: &[u8], name: &str) -> AtelierResult<()> {
        self.from_buffer(image, bytes, name).await
    }

    /// Download, decode and ingest `link`.
    pub async fn from_url(&self, image: &mut Image, link: &str) -> AtelierResult<()> {
        let (staged, name) = self.assets.stage_url(image, link).await?;
        self.from_file(image, staged.path(), name.as_deref()).await
    }

    /// Alias of [`from_url`](Self::from_url).
    pub async fn download(&self, image: &mut Image, link: &str) -> AtelierResult<()> {
        self.from_url(image, link).await
    }

    /// Start a derived variant named `variant` of a persisted image.
    ///
    /// Fetches the primary blob into the scratch area unless another variant
    /// of the same image is already in flight, in which case the fetched copy
    /// is reused. The copy is deleted when the last handle is committed or
    /// dropped.
    ///
    /// # Errors
    ///
    /// `InvalidVariant` for names outside `[A-Za-z0-9_-]`, `NotPersisted` for
    /// images never saved, `LockTimeout` when the download lock is contended
    /// for too long, and transport or decode failures of the source.
    #[tracing::instrument(skip(self, image), fields(id = ?image.asset().id()))]
    pub async fn thumb(&self, image: &Image, variant: &str) -> AtelierResult<VariantHandle> {
        validate_variant(variant)?;
        let asset = image.asset();
        let id = asset
            .id()
            .ok_or_else(|| AssetError::new(AssetErrorKind::NotPersisted))?;
        let hash = asset
            .hash()
            .ok_or_else(|| AssetError::new(AssetErrorKind::NotPersisted))?;
        let source_key = BlobKey::primary(asset)?;
        let key = BlobKey::variant(asset, variant)?;
        let transport = self.assets.transport_for(image)?;

        let scratch = self.assets.scratch();
        scratch.ensure().await?;
        let source = scratch.source_path(hash);

        let guard = self.debounce.locker.lock(&lock_key(id)).await?;
        if self.debounce.in_flight.count(id) == 0 {
            if let Err(e) = transport.pull(&source_key, &source).await {
                let _ = tokio::fs::remove_file(&source).await;
                tracing::warn!(key = %source_key, error = %e, "Failed to fetch variant source");
                return Err(e);
            }
            tracing::debug!(key = %source_key, "Fetched variant source");
        } else {
            tracing::debug!(key = %source_key, "Reusing fetched variant source");
        }
        let lease = SourceLease::acquire(self.debounce.clone(), id, source.clone());
        guard.release();

        let bytes = match tokio::fs::read(&source).await {
            Ok(bytes) => bytes,
            Err(e) => {
                lease.release().await;
                return Err(AssetError::io(source.display(), e).into());
            }
        };
        let (decoded, format) = match decode_blocking(bytes).await {
            Ok(decoded) => decoded,
            Err(e) => {
                lease.release().await;
                return Err(e);
            }
        };

        Ok(VariantHandle::new(
            variant.to_string(),
            id,
            key,
            decoded,
            format,
            transport,
            self.assets.clone(),
            lease,
        ))
    }

    /// Locator of the primary blob or of `variant`, without checking either.
    pub async fn url(&self, image: &Image, variant: Option<&str>) -> AtelierResult<String> {
        self.assets.url(image, variant).await
    }

    /// Locator of a variant registered on `image`.
    ///
    /// # Errors
    ///
    /// `UnknownVariant` when `variant` was never committed.
    pub async fn registered_url(&self, image: &Image, variant: &str) -> AtelierResult<String> {
        if image.thumb(variant).is_none() {
            return Err(AssetError::new(AssetErrorKind::UnknownVariant(variant.to_string())).into());
        }
        self.assets.url(image, Some(variant)).await
    }

    /// Remove every registered variant, then the primary blob and record.
    ///
    /// Variant failures are reported, not raised.
    #[tracing::instrument(skip_all, fields(id = ?image.asset().id(), variants = image.thumbs().len()))]
    pub async fn remove(&self, image: &Image) -> AtelierResult<RemovalReport> {
        let asset = image.asset();
        self.assets.hooks().before(HookEvent::ImageRemove, asset).await?;

        let mut report = RemovalReport::default();
        for name in image.thumbs().keys() {
            let (target, result) = match BlobKey::variant(asset, name) {
                Ok(key) => {
                    let result = match self.assets.transport_for(image) {
                        Ok(transport) => transport.remove(&key).await,
                        Err(e) => Err(e),
                    };
                    (key.to_string(), result)
                }
                Err(e) => (name.clone(), Err(e)),
            };
            report.record(target, result);
        }

        let report = self.assets.remove_with(image, report).await?;
        if let Err(e) = self.assets.hooks().after(HookEvent::ImageRemove, asset).await {
            tracing::warn!(error = %e, "Post-removal hook failed");
        }
        Ok(report)
    }

    /// Default projection plus every registered variant with its locator.
    pub async fn sanitise(&self, image: &Image) -> AtelierResult<Sanitised> {
        let mut out = self.assets.sanitise(image).await?;

        let mut thumbs = Map::new();
        for (name, thumb) in image.thumbs() {
            let mut entry = match serde_json::to_value(thumb).map_err(|e| JsonError::new(e.to_string()))? {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            let url = self.assets.url(image, Some(name)).await?;
            entry.insert("url".to_string(), Value::String(url));
            thumbs.insert(name.clone(), Value::Object(entry));
        }
        out.insert("thumbs".to_string(), Value::Object(thumbs));
        Ok(out)
    }

    /// Projection of exactly `fields`.
    pub fn sanitise_fields(&self, image: &Image, fields: &[&str]) -> AtelierResult<Sanitised> {
        self.assets.sanitise_fields(image, fields)
    }
}
