//! In-memory implementation of AssetRepository.
//!
//! Keeps serialized records in a HashMap. Useful for tests and for embedding
//! the store where records are rebuilt on every start.

use async_trait::async_trait;
use atelier_core::{AssetId, AssetKind};
use atelier_error::AtelierResult;
use atelier_interface::{AssetRepository, StoredRecord};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory record store.
///
/// Clones share the same records. All data is lost when the last clone is
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetRepository {
    records: Arc<RwLock<HashMap<AssetId, StoredRecord>>>,
}

impl InMemoryAssetRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check if the repository is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Identities of every stored record.
    pub async fn ids(&self) -> Vec<AssetId> {
        let mut ids: Vec<_> = self.records.read().await.keys().copied().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl AssetRepository for InMemoryAssetRepository {
    async fn save(
        &self,
        id: Option<AssetId>,
        kind: AssetKind,
        record: &JsonValue,
    ) -> AtelierResult<AssetId> {
        let id = id.unwrap_or_else(AssetId::generate);
        self.records
            .write()
            .await
            .insert(id, StoredRecord::new(id, kind, record.clone()));
        Ok(id)
    }

    async fn load(&self, id: AssetId) -> AtelierResult<Option<StoredRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn remove(&self, id: AssetId) -> AtelierResult<()> {
        self.records.write().await.remove(&id);
        Ok(())
    }
}
