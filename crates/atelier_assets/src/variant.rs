//! Pending derived variants.

use crate::debounce::SourceLease;
use crate::decode::{encode_blocking, extension_for};
use crate::{AssetStore, TempFile};
use atelier_core::{AssetId, BlobKey, Entity, Image, Thumb};
use atelier_error::{AssetError, AssetErrorKind, AtelierResult};
use atelier_transport::Transport;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::sync::Arc;

/// A variant being prepared from a decoded source image.
///
/// Obtained from [`ImageStore::thumb`](crate::ImageStore::thumb). Apply
/// transforms, then [`commit`](Self::commit) to encode, push and register the
/// variant. The output format defaults to the source format.
///
/// The handle holds a claim on the shared fetched source. Committing releases
/// it; dropping an uncommitted handle releases it in the background.
pub struct VariantHandle {
    name: String,
    id: AssetId,
    key: BlobKey,
    image: DynamicImage,
    format: ImageFormat,
    transport: Arc<dyn Transport>,
    store: AssetStore,
    lease: Option<SourceLease>,
}

impl VariantHandle {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        id: AssetId,
        key: BlobKey,
        image: DynamicImage,
        format: ImageFormat,
        transport: Arc<dyn Transport>,
        store: AssetStore,
        lease: SourceLease,
    ) -> Self {
        Self {
            name,
            id,
            key,
            image,
            format,
            transport,
            store,
            lease: Some(lease),
        }
    }

    /// Variant name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backend key the variant will be stored under.
    pub fn key(&self) -> &BlobKey {
        &self.key
    }

    /// Current pixels.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Mutable access to the pixels for arbitrary transforms.
    pub fn image_mut(&mut self) -> &mut DynamicImage {
        &mut self.image
    }

    /// Replace the pixels.
    pub fn set_image(&mut self, image: DynamicImage) -> &mut Self {
        self.image = image;
        self
    }

    /// Output format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Scale down to fit within `width` x `height`, keeping the aspect ratio.
    pub fn thumbnail(&mut self, width: u32, height: u32) -> &mut Self {
        self.image = self.image.thumbnail(width, height);
        self
    }

    /// Scale to exactly `width` x `height`.
    pub fn resize_exact(&mut self, width: u32, height: u32) -> &mut Self {
        self.image = self.image.resize_exact(width, height, FilterType::Lanczos3);
        self
    }

    /// Keep the `width` x `height` region at (`x`, `y`).
    pub fn crop(&mut self, x: u32, y: u32, width: u32, height: u32) -> &mut Self {
        self.image = self.image.crop_imm(x, y, width, height);
        self
    }

    /// Encode the output as `format`.
    pub fn with_format(&mut self, format: ImageFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Encode, push and register the variant on `image`, then save it.
    ///
    /// `image` must be the image the handle was created from. The registry
    /// entry is only added once the encoded blob has been pushed. The shared
    /// source claim is released whether or not this succeeds.
    #[tracing::instrument(skip_all, fields(id = %self.id, variant = %self.name))]
    pub async fn commit(mut self, image: &mut Image) -> AtelierResult<Thumb> {
        let lease = self.lease.take();
        let result = self.encode_and_store(image).await;
        if let Some(lease) = lease {
            lease.release().await;
        }
        result
    }

    async fn encode_and_store(self, image: &mut Image) -> AtelierResult<Thumb> {
        if image.asset().id() != Some(self.id) {
            return Err(AssetError::new(AssetErrorKind::WrongAsset(format!(
                "{} belongs to {}",
                self.name, self.id
            )))
            .into());
        }

        let hash = image
            .asset()
            .hash()
            .ok_or_else(|| AssetError::new(AssetErrorKind::NotPersisted))?
            .to_string();
        let (bytes, meta) = encode_blocking(self.image, self.format).await?;

        let scratch = self.store.scratch();
        scratch.ensure().await?;
        let encoded = TempFile::new(scratch.variant_path(&hash, &self.name));
        tokio::fs::write(encoded.path(), &bytes)
            .await
            .map_err(|e| AssetError::io(encoded.path().display(), e))?;

        self.transport.push(&self.key, encoded.path()).await?;
        drop(encoded);

        let thumb = Thumb::new(self.name.as_str(), extension_for(self.format), meta);
        image.insert_thumb(thumb.clone());
        self.store.save(image).await?;

        tracing::info!(key = %self.key, size = bytes.len(), "Committed variant");
        Ok(thumb)
    }
}

impl std::fmt::Debug for VariantHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantHandle")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("key", &self.key)
            .field("format", &self.format)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish_non_exhaustive()
    }
}
