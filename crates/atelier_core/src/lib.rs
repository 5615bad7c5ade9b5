//! Core data types for the Atelier asset store.
//!
//! This crate holds the persisted shape of stored assets and the canonical
//! backend keys derived from them. It performs no I/O.
//!
//! - [`Asset`] is the base file record (hash, name, extension, size, transport).
//! - [`Image`] composes an [`Asset`] with decoded [`ImageMeta`] and its
//!   registry of derived [`Thumb`] variants.
//! - [`BlobKey`] is the deterministic storage key for a primary blob or a variant.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod entity;
mod image;
mod key;

pub use asset::{Asset, AssetId, extension_of};
pub use entity::{AssetKind, Entity};
pub use image::{Image, ImageMeta, Thumb};
pub use key::{BlobKey, validate_variant};
