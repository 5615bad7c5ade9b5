//! In-memory transport.
//!
//! Keeps blobs in a map and records every push, pull and remove it serves.
//! Useful for ephemeral deployments and for asserting I/O patterns in tests.

use crate::{Transport, join_url};
use atelier_core::BlobKey;
use atelier_error::{AtelierResult, TransportError};
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Kind of a logged transport operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TransportOp {
    /// Upload
    Push,
    /// Download
    Pull,
    /// Delete
    Remove,
}

/// One logged operation and the key it targeted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportCall {
    /// Operation performed
    pub op: TransportOp,
    /// Key it targeted
    pub key: String,
}

/// In-memory transport backend.
///
/// Clones share the same blobs and call log.
///
/// # Example
///
/// ```
/// use atelier_transport::{MemoryTransport, TransportOp};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let transport = MemoryTransport::new("/media");
/// assert_eq!(transport.count(TransportOp::Pull).await, 0);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    url_prefix: String,
    blobs: Arc<RwLock<HashMap<String, Bytes>>>,
    calls: Arc<RwLock<Vec<TransportCall>>>,
    failing: Arc<RwLock<HashSet<String>>>,
}

impl MemoryTransport {
    /// Create an empty transport whose locators start with `url_prefix`.
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            blobs: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Make every push, pull and remove of `key` fail with a transport failure.
    pub async fn fail_on(&self, key: impl Into<String>) {
        self.failing.write().await.insert(key.into());
    }

    /// Stored bytes under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.blobs.read().await.get(key).cloned()
    }

    /// Insert bytes directly, bypassing the call log.
    pub async fn insert(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.blobs.write().await.insert(key.into(), data.into());
    }

    /// Keys currently stored, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.blobs.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Every logged operation in call order.
    pub async fn calls(&self) -> Vec<TransportCall> {
        self.calls.read().await.clone()
    }

    /// Number of logged operations of one kind.
    pub async fn count(&self, op: TransportOp) -> usize {
        self.calls.read().await.iter().filter(|c| c.op == op).count()
    }

    async fn record(&self, op: TransportOp, key: &BlobKey) -> AtelierResult<()> {
        self.calls.write().await.push(TransportCall {
            op,
            key: key.as_str().to_string(),
        });
        if self.failing.read().await.contains(key.as_str()) {
            return Err(TransportError::failure(format!("injected {} failure for {}", op, key)).into());
        }
        Ok(())
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new(crate::DEFAULT_URL_PREFIX)
    }
}

#[async_trait::async_trait]
impl Transport for MemoryTransport {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn push(&self, key: &BlobKey, local: &Path) -> AtelierResult<()> {
        self.record(TransportOp::Push, key).await?;
        let data = tokio::fs::read(local).await.map_err(|e| {
            TransportError::failure(format!("read {}: {}", local.display(), e))
        })?;
        tracing::debug!(key = %key, size = data.len(), "Stored blob in memory");
        self.blobs
            .write()
            .await
            .insert(key.as_str().to_string(), Bytes::from(data));
        Ok(())
    }

    async fn pull(&self, key: &BlobKey, dest: &Path) -> AtelierResult<()> {
        self.record(TransportOp::Pull, key).await?;
        let data = self
            .get(key.as_str())
            .await
            .ok_or_else(|| TransportError::not_found(key.as_str()))?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TransportError::failure(format!("create {}: {}", parent.display(), e))
            })?;
        }
        tokio::fs::write(dest, &data).await.map_err(|e| {
            TransportError::failure(format!("write {}: {}", dest.display(), e))
        })?;
        Ok(())
    }

    async fn remove(&self, key: &BlobKey) -> AtelierResult<()> {
        self.record(TransportOp::Remove, key).await?;
        self.blobs
            .write()
            .await
            .remove(key.as_str())
            .map(|_| ())
            .ok_or_else(|| TransportError::not_found(key.as_str()).into())
    }

    async fn url(&self, key: &BlobKey) -> AtelierResult<String> {
        Ok(join_url(&self.url_prefix, key))
    }

    async fn exists(&self, key: &BlobKey) -> AtelierResult<bool> {
        Ok(self.blobs.read().await.contains_key(key.as_str()))
    }
}
