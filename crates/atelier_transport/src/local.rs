//! Filesystem-based transport implementation.
//!
//! This backend keeps every blob as one file directly under a base directory,
//! named by its canonical key.

use crate::{Transport, join_url};
use atelier_core::BlobKey;
use atelier_error::{AtelierResult, TransportError, TransportErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Filesystem transport backend.
///
/// Stores blobs flat under the base directory:
///
/// ```text
/// /var/atelier/media/
/// ├── 5f0c...e1.png          (primary blob)
/// ├── 5f0c...e1-small        (variant "small")
/// └── 5f0c...e1-large        (variant "large")
/// ```
///
/// # Features
///
/// - **Atomic writes**: Pushes land in a hidden `.{key}.{seq}.tmp` and are renamed into place
/// - **Path-safe keys**: Keys containing separators or dot-segments are rejected
/// - **Static URLs**: Locators are `{url_prefix}/{key}` for a static file server
#[derive(Debug, Clone)]
pub struct LocalTransport {
    base_path: PathBuf,
    url_prefix: String,
}

impl LocalTransport {
    /// Create a new filesystem transport.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `base_path` - Root directory for stored blobs
    /// * `url_prefix` - Prefix of the locators returned by `url()`
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path, url_prefix))]
    pub fn new(base_path: impl Into<PathBuf>, url_prefix: impl Into<String>) -> AtelierResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            TransportError::new(TransportErrorKind::InvalidConfig(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created local transport");
        Ok(Self {
            base_path,
            url_prefix: url_prefix.into(),
        })
    }

    /// Root directory of this transport.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the filesystem path for a key.
    fn get_path(&self, key: &BlobKey) -> AtelierResult<PathBuf> {
        let key = key.as_str();
        // Dot-prefixed names are reserved for in-progress pushes.
        let unsafe_key = key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']);
        if unsafe_key {
            return Err(TransportError::new(TransportErrorKind::InvalidKey(key.to_string())).into());
        }
        Ok(self.base_path.join(key))
    }
}

fn io_error(op: &str, path: &Path, e: std::io::Error) -> TransportError {
    if e.kind() == std::io::ErrorKind::NotFound {
        TransportError::not_found(path.display().to_string())
    } else {
        TransportError::failure(format!("{} {}: {}", op, path.display(), e))
    }
}

#[async_trait::async_trait]
impl Transport for LocalTransport {
    fn backend(&self) -> &'static str {
        "local"
    }

    #[tracing::instrument(skip(self, key, local), fields(key = %key, local = %local.display()))]
    async fn push(&self, key: &BlobKey, local: &Path) -> AtelierResult<()> {
        let path = self.get_path(key)?;

        // Write to temp file first, then rename for atomicity.
        // Concurrent pushes to one key each get their own temp file.
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp_path = path.with_file_name(format!(".{}.{}.tmp", key.as_str(), seq));
        let size = tokio::fs::copy(local, &temp_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TransportError::failure(format!("source {} is missing", local.display()))
            } else {
                TransportError::failure(format!("copy {}: {}", temp_path.display(), e))
            }
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(TransportError::failure(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            ))
            .into());
        }

        tracing::info!(key = %key, path = %path.display(), size, "Pushed blob");
        Ok(())
    }

    #[tracing::instrument(skip(self, key, dest), fields(key = %key, dest = %dest.display()))]
    async fn pull(&self, key: &BlobKey, dest: &Path) -> AtelierResult<()> {
        let path = self.get_path(key)?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create", parent, e))?;
        }

        let size = tokio::fs::copy(&path, dest)
            .await
            .map_err(|e| io_error("copy", &path, e))?;

        tracing::debug!(key = %key, size, "Pulled blob");
        Ok(())
    }

    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn remove(&self, key: &BlobKey) -> AtelierResult<()> {
        let path = self.get_path(key)?;

        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| io_error("delete", &path, e))?;

        tracing::info!(key = %key, path = %path.display(), "Removed blob");
        Ok(())
    }

    async fn url(&self, key: &BlobKey) -> AtelierResult<String> {
        Ok(join_url(&self.url_prefix, key))
    }

    async fn exists(&self, key: &BlobKey) -> AtelierResult<bool> {
        let path = self.get_path(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_error("stat", &path, e).into())
    }
}
