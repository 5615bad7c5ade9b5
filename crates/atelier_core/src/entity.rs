//! Persistable entity abstraction.

use crate::Asset;
use serde::{Serialize, de::DeserializeOwned};

/// Which flavour of record an entity is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::EnumString,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetKind {
    /// Plain file
    #[display("file")]
    File,
    /// Decoded image with derived variants
    #[display("image")]
    Image,
}

/// A record that wraps an [`Asset`] and can be saved as an opaque JSON object.
///
/// The persistence layer sees only the serialized form; the typed view is
/// recovered with [`serde_json::from_value`].
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Record flavour, stored alongside the fields.
    const KIND: AssetKind;

    /// The base asset fields.
    fn asset(&self) -> &Asset;

    /// Mutable access to the base asset fields.
    fn asset_mut(&mut self) -> &mut Asset;
}

impl Entity for Asset {
    const KIND: AssetKind = AssetKind::File;

    fn asset(&self) -> &Asset {
        self
    }

    fn asset_mut(&mut self) -> &mut Asset {
        self
    }
}
