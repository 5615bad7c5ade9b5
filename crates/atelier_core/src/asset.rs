//! Base asset record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Identity assigned by the persistence layer when a record is first saved.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    /// Generate a fresh random identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identity from its string form.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

/// A stored file.
///
/// Fields are populated during ingestion. `hash` and `transport` never change
/// after they are first assigned and `ext` is only filled while absent. A new
/// upload refreshes `size`, and `name` when the caller supplies one.
///
/// # Examples
///
/// ```
/// use atelier_core::Asset;
///
/// let mut asset = Asset::default();
/// asset.ensure_ext("photo.PNG");
/// let hash = asset.ensure_hash().to_string();
/// asset.set_name(None);
///
/// assert_eq!(asset.ext(), Some("png"));
/// assert_eq!(asset.name(), Some(format!("{}.png", hash).as_str()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<AssetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl Asset {
    /// Persistence identity, once saved.
    pub fn id(&self) -> Option<AssetId> {
        self.id
    }

    /// Storage identity token.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Display filename.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Lower-cased extension without the leading dot.
    pub fn ext(&self) -> Option<&str> {
        self.ext.as_deref()
    }

    /// Byte length of the stored blob.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Name of the transport that owns this asset's bytes.
    pub fn transport(&self) -> Option<&str> {
        self.transport.as_deref()
    }

    /// When the asset was first ingested.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Whether the record has been saved at least once.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Set the extension from a filename if none is recorded yet.
    pub fn ensure_ext(&mut self, name: &str) -> &str {
        self.ext.get_or_insert_with(|| extension_of(name))
    }

    /// Replace the extension with a detected format.
    ///
    /// Only used by format-sniffing ingestion before the base routine runs.
    pub fn override_ext(&mut self, ext: &str) {
        self.ext = Some(ext.trim_start_matches('.').to_ascii_lowercase());
    }

    /// Generate the storage identity if none is recorded yet.
    pub fn ensure_hash(&mut self) -> &str {
        self.hash.get_or_insert_with(|| Uuid::new_v4().to_string())
    }

    /// Record the display name.
    ///
    /// A non-empty `name` replaces the current one. Otherwise an existing name
    /// is kept and a missing one defaults to `hash.ext`.
    pub fn set_name(&mut self, name: Option<&str>) {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.name = Some(name.to_string());
            return;
        }
        if self.name.is_some() {
            return;
        }
        let hash = self.ensure_hash().to_string();
        let name = match self.ext.as_deref() {
            Some(ext) if !ext.is_empty() => format!("{}.{}", hash, ext),
            _ => hash,
        };
        self.name = Some(name);
    }

    /// Record the byte length captured at ingestion.
    pub fn record_size(&mut self, size: u64) {
        self.size = Some(size);
    }

    /// Fix the owning transport. First write wins.
    pub fn ensure_transport(&mut self, name: &str) -> &str {
        self.transport.get_or_insert_with(|| name.to_string())
    }

    /// Stamp the creation time if not already set.
    pub fn ensure_created_at(&mut self) {
        self.created_at.get_or_insert_with(Utc::now);
    }

    /// Assign the persistence identity. First write wins.
    pub fn assign_id(&mut self, id: AssetId) -> AssetId {
        *self.id.get_or_insert(id)
    }
}

/// Lower-cased extension of a filename, without the dot.
///
/// Returns an empty string when the name has none.
///
/// ```
/// use atelier_core::extension_of;
///
/// assert_eq!(extension_of("Cat.JPG"), "jpg");
/// assert_eq!(extension_of("archive.tar.gz"), "gz");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}
