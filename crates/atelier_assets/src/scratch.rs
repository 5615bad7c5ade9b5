//! Process-local scratch area for files in transit.

use atelier_error::{AssetError, AtelierResult};
use std::path::{Path, PathBuf};

/// Directory holding transient files: incoming uploads, fetched sources and
/// encoded variants waiting to be pushed.
///
/// File names are derived from asset hashes so concurrent operations on
/// different assets never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Scratch area rooted at `root`. Nothing is created until [`ensure`](Self::ensure).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it is missing.
    pub async fn ensure(&self) -> AtelierResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AssetError::io(self.root.display(), e))?;
        Ok(())
    }

    /// Where uploaded bytes or downloaded URLs are staged before ingestion.
    pub fn incoming_path(&self, hash: &str) -> PathBuf {
        self.root.join(format!("{}.incoming", hash))
    }

    /// Where the primary blob is fetched while variants are generated.
    pub fn source_path(&self, hash: &str) -> PathBuf {
        self.root.join(hash)
    }

    /// Where an encoded variant waits to be pushed.
    pub fn variant_path(&self, hash: &str, variant: &str) -> PathBuf {
        self.root.join(format!("{}-{}", hash, variant))
    }
}

/// A scratch file deleted when the guard goes out of scope.
///
/// The file itself may or may not exist; the guard only owns the path.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Take ownership of `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the guarded file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::trace!(path = %self.path.display(), "Removed scratch file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove scratch file")
            }
        }
    }
}
