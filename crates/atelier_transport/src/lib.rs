//! Pluggable blob transports for Atelier.
//!
//! A transport physically stores the bytes of assets and their derived
//! variants. Asset records only remember the *name* of the transport that owns
//! them; the [`TransportRegistry`] resolves that name to an instance built at
//! startup from [`TransportConfig`] entries.
//!
//! # Backends
//!
//! - [`LocalTransport`]: files under a directory, atomic temp-file + rename writes
//! - [`HttpTransport`]: an object store reachable with plain `PUT`/`GET`/`DELETE`
//! - [`MemoryTransport`]: in-process map with a call log, for ephemeral setups and tests
//!
//! # Example
//!
//! ```rust,no_run
//! use atelier_core::{Asset, BlobKey};
//! use atelier_transport::{LocalTransport, Transport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = LocalTransport::new("/var/atelier/media", "/media")?;
//!
//! let mut asset = Asset::default();
//! asset.ensure_ext("photo.png");
//! asset.ensure_hash();
//!
//! let key = BlobKey::primary(&asset)?;
//! transport.push(&key, "/tmp/upload.png".as_ref()).await?;
//! println!("served at {}", transport.url(&key).await?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use atelier_core::BlobKey;
use atelier_error::AtelierResult;
use std::path::Path;

mod config;
mod http;
mod local;
mod memory;
mod registry;

pub use config::{DEFAULT_LOCAL_DIRECTORY, DEFAULT_URL_PREFIX, TransportConfig};
pub use http::HttpTransport;
pub use local::LocalTransport;
pub use memory::{MemoryTransport, TransportCall, TransportOp};
pub use registry::{FALLBACK_TRANSPORT, TransportRegistry};

/// Trait for pluggable blob storage backends.
///
/// Implementations move whole files between the local scratch area and the
/// backend. They must be safe to call concurrently for different keys;
/// concurrent pushes to the same key may resolve last-write-wins but must not
/// leave a torn blob behind.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Backend flavour (e.g., "local", "http", "memory").
    fn backend(&self) -> &'static str;

    /// Upload the file at `local` under `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - Canonical key of the primary blob or a variant
    /// * `local` - Path of a readable local file
    async fn push(&self, key: &BlobKey, local: &Path) -> AtelierResult<()>;

    /// Download the blob under `key` to `dest`.
    ///
    /// # Errors
    ///
    /// Fails with a transport `NotFound` when no blob exists under `key`.
    async fn pull(&self, key: &BlobKey, dest: &Path) -> AtelierResult<()>;

    /// Delete the blob under `key`.
    ///
    /// # Errors
    ///
    /// Fails with a transport `NotFound` when no blob exists under `key`.
    /// Cleanup callers treat this as non-fatal.
    async fn remove(&self, key: &BlobKey) -> AtelierResult<()>;

    /// Resolvable locator (absolute URL or path) for the blob.
    ///
    /// Does not check that the blob currently exists.
    async fn url(&self, key: &BlobKey) -> AtelierResult<String>;

    /// Check if a blob is stored under `key`.
    async fn exists(&self, key: &BlobKey) -> AtelierResult<bool>;
}

/// Join a URL prefix and a key with exactly one slash.
pub(crate) fn join_url(prefix: &str, key: &BlobKey) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), key.as_str())
}
