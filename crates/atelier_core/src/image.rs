//! Image record and derived-variant registry.

use crate::{Asset, AssetKind, Entity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structural metadata captured from a decoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ImageMeta {
    /// Canonical extension of the detected format (`png`, `jpeg`, ...)
    format: String,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Pixel layout of the decoded buffer (e.g. `Rgba8`)
    color: String,
    /// Encoded byte length
    size: u64,
}

impl ImageMeta {
    /// Create metadata from decoded properties.
    pub fn new(
        format: impl Into<String>,
        width: u32,
        height: u32,
        color: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            format: format.into(),
            width,
            height,
            color: color.into(),
            size,
        }
    }
}

/// One registered derived variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Thumb {
    /// Extension of the encoded variant
    ext: String,
    /// Metadata decoded from the encoded variant
    meta: ImageMeta,
    /// Variant name, also the key suffix in the transport
    name: String,
}

impl Thumb {
    /// Create a variant record.
    pub fn new(name: impl Into<String>, ext: impl Into<String>, meta: ImageMeta) -> Self {
        Self {
            ext: ext.into(),
            meta,
            name: name.into(),
        }
    }
}

/// An asset known to be an image.
///
/// Serializes flat: the base asset fields sit next to `meta` and `thumbs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(flatten)]
    asset: Asset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<ImageMeta>,
    #[serde(default)]
    thumbs: BTreeMap<String, Thumb>,
}

impl Image {
    /// Wrap an existing asset record.
    pub fn from_asset(asset: Asset) -> Self {
        Self {
            asset,
            ..Self::default()
        }
    }

    /// Metadata of the primary blob.
    pub fn meta(&self) -> Option<&ImageMeta> {
        self.meta.as_ref()
    }

    /// Record the metadata of a freshly decoded primary blob.
    pub fn set_meta(&mut self, meta: ImageMeta) {
        self.meta = Some(meta);
    }

    /// Registered variants keyed by name.
    pub fn thumbs(&self) -> &BTreeMap<String, Thumb> {
        &self.thumbs
    }

    /// Look up a registered variant.
    pub fn thumb(&self, name: &str) -> Option<&Thumb> {
        self.thumbs.get(name)
    }

    /// Register a variant whose blob has been pushed.
    pub fn insert_thumb(&mut self, thumb: Thumb) {
        self.thumbs.insert(thumb.name.clone(), thumb);
    }
}

impl Entity for Image {
    const KIND: AssetKind = AssetKind::Image;

    fn asset(&self) -> &Asset {
        &self.asset
    }

    fn asset_mut(&mut self) -> &mut Asset {
        &mut self.asset
    }
}

impl From<Asset> for Image {
    fn from(asset: Asset) -> Self {
        Self::from_asset(asset)
    }
}
