//! Atelier - content-addressed asset store.
//!
//! Atelier ingests files from local paths, in-memory buffers and remote URLs,
//! keeps their bytes in pluggable transports (local disk, HTTP object stores,
//! memory) under hash-derived keys, and generates named image variants on
//! demand while fetching each source at most once per burst of requests.
//!
//! # Crates
//!
//! - `atelier_error`: error taxonomy
//! - `atelier_core`: asset records and canonical keys
//! - `atelier_interface`: persistence, hook and lock contracts
//! - `atelier_transport`: storage backends and their registry
//! - `atelier_assets`: ingestion, variants, removal and projections
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use atelier::{Atelier, AtelierConfig, Image, JsonFileRepository};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AtelierConfig::load()?;
//! let repository = Arc::new(JsonFileRepository::new(&config.records_dir)?);
//! let atelier = Atelier::new(&config, repository)?;
//!
//! let mut image = Image::default();
//! atelier
//!     .images()
//!     .from_file(&mut image, "cat.png".as_ref(), None)
//!     .await?;
//!
//! let mut small = atelier.images().thumb(&image, "small").await?;
//! small.thumbnail(128, 128);
//! small.commit(&mut image).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
mod config;
mod observability;
mod records;

pub use app::Atelier;
pub use config::AtelierConfig;
pub use observability::{ObservabilityConfig, init_observability};
pub use records::JsonFileRepository;

pub use atelier_assets::{
    AssetStore, HookBus, ImageStore, InMemoryAssetRepository, KeyedLocker, RemovalOutcome,
    RemovalReport, Sanitised, ScratchDir, TempFile, VariantHandle,
};
pub use atelier_core::{Asset, AssetId, AssetKind, BlobKey, Entity, Image, ImageMeta, Thumb};
pub use atelier_error::{
    AssetError, AssetErrorKind, AtelierError, AtelierErrorKind, AtelierResult, ConfigError,
    HttpError, JsonError, TransportError, TransportErrorKind,
};
pub use atelier_interface::{AssetHook, AssetRepository, HookEvent, LockGuard, Locker, StoredRecord};
pub use atelier_transport::{
    HttpTransport, LocalTransport, MemoryTransport, Transport, TransportConfig, TransportRegistry,
};
