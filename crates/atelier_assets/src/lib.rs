//! Asset lifecycle for Atelier: ingestion, derived image variants, removal.
//!
//! Two services cover the lifecycle:
//!
//! - [`AssetStore`] ingests files from bytes, URLs or local paths, pushes the
//!   primary blob to the asset's transport, persists the record, resolves
//!   URLs, removes assets best-effort and produces sanitised projections.
//! - [`ImageStore`] wraps an `AssetStore`: it decodes images before handing
//!   them to the shared ingestion routine and generates named variants
//!   (thumbnails) through [`VariantHandle`]s, fetching the shared source blob
//!   at most once while several variants of one asset are in flight.
//!
//! # Example
//!
//! ```rust,no_run
//! use atelier_assets::{AssetStore, ImageStore, InMemoryAssetRepository, KeyedLocker, ScratchDir};
//! use atelier_core::Image;
//! use atelier_transport::{MemoryTransport, TransportRegistry};
//! use std::sync::Arc;
//!
//! # async fn example(png: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = TransportRegistry::new(Some("memory"));
//! registry.register("memory", Arc::new(MemoryTransport::default()));
//!
//! let assets = AssetStore::new(
//!     Arc::new(registry),
//!     Arc::new(InMemoryAssetRepository::new()),
//!     ScratchDir::new("data/cache/tmp"),
//! );
//! let images = ImageStore::new(assets, Arc::new(KeyedLocker::default()));
//!
//! let mut image = Image::default();
//! images.from_buffer(&mut image, &png, "cat.png").await?;
//!
//! let mut handle = images.thumb(&image, "small").await?;
//! handle.thumbnail(64, 64);
//! handle.commit(&mut image).await?;
//!
//! println!("{}", images.sanitise(&image).await?["thumbs"]["small"]["url"]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod debounce;
mod decode;
mod hooks;
mod image_store;
mod ingest;
mod locker;
mod removal;
mod repository;
mod sanitise;
mod scratch;
mod store;
mod variant;

pub use decode::{decode_meta, extension_for};
pub use hooks::HookBus;
pub use image_store::ImageStore;
pub use locker::{DEFAULT_LOCK_TIMEOUT, KeyedLocker};
pub use removal::{RemovalOutcome, RemovalReport};
pub use repository::InMemoryAssetRepository;
pub use sanitise::Sanitised;
pub use scratch::{ScratchDir, TempFile};
pub use store::AssetStore;
pub use variant::VariantHandle;
