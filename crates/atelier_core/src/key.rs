//! Canonical backend storage keys.

use crate::Asset;
use atelier_error::{AssetError, AssetErrorKind, AtelierResult};

/// Deterministic key under which a transport stores a blob.
///
/// - primary blob: `{hash}.{ext}` (or `{hash}` when the asset has no extension)
/// - variant blob: `{hash}-{variant}`
///
/// # Examples
///
/// ```
/// use atelier_core::{Asset, BlobKey};
///
/// let mut asset = Asset::default();
/// asset.ensure_ext("a.gif");
/// let hash = asset.ensure_hash().to_string();
///
/// let primary = BlobKey::primary(&asset).unwrap();
/// assert_eq!(primary.as_str(), format!("{}.gif", hash));
///
/// let small = BlobKey::variant(&asset, "small").unwrap();
/// assert_eq!(small.as_str(), format!("{}-small", hash));
/// assert_eq!(small.variant_name(), Some("small"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{}", key)]
pub struct BlobKey {
    key: String,
    variant: Option<String>,
}

impl BlobKey {
    /// Key of the primary blob.
    ///
    /// # Errors
    ///
    /// Returns `NotPersisted` when the asset has no hash yet.
    pub fn primary(asset: &Asset) -> AtelierResult<Self> {
        let hash = hash_of(asset)?;
        let key = match asset.ext() {
            Some(ext) if !ext.is_empty() => format!("{}.{}", hash, ext),
            _ => hash.to_string(),
        };
        Ok(Self { key, variant: None })
    }

    /// Key of a named variant.
    ///
    /// # Errors
    ///
    /// Returns `NotPersisted` when the asset has no hash yet, or
    /// `InvalidVariant` when the name is not path-safe.
    pub fn variant(asset: &Asset, variant: &str) -> AtelierResult<Self> {
        validate_variant(variant)?;
        let hash = hash_of(asset)?;
        Ok(Self {
            key: format!("{}-{}", hash, variant),
            variant: Some(variant.to_string()),
        })
    }

    /// Key of the primary blob or, when given, a variant.
    pub fn for_asset(asset: &Asset, variant: Option<&str>) -> AtelierResult<Self> {
        match variant {
            Some(variant) => Self::variant(asset, variant),
            None => Self::primary(asset),
        }
    }

    /// Key as a string.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Variant name, if this is not the primary blob.
    pub fn variant_name(&self) -> Option<&str> {
        self.variant.as_deref()
    }
}

impl AsRef<str> for BlobKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

fn hash_of(asset: &Asset) -> AtelierResult<&str> {
    asset
        .hash()
        .ok_or_else(|| AssetError::new(AssetErrorKind::NotPersisted).into())
}

/// Check that a variant name is non-empty and limited to `[A-Za-z0-9_-]`.
///
/// ```
/// use atelier_core::validate_variant;
///
/// assert!(validate_variant("small_2x").is_ok());
/// assert!(validate_variant("../etc").is_err());
/// assert!(validate_variant("").is_err());
/// ```
pub fn validate_variant(name: &str) -> AtelierResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AssetError::new(AssetErrorKind::InvalidVariant(name.to_string())).into())
    }
}
