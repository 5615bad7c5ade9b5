//! Persistence contract.

use async_trait::async_trait;
use atelier_core::{AssetId, AssetKind};
use atelier_error::AtelierResult;
use serde_json::Value as JsonValue;

/// A record as the persistence layer returns it.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct StoredRecord {
    /// Identity assigned on first save
    id: AssetId,
    /// Record flavour
    kind: AssetKind,
    /// Serialized fields
    record: JsonValue,
}

impl StoredRecord {
    /// Assemble a stored record.
    pub fn new(id: AssetId, kind: AssetKind, record: JsonValue) -> Self {
        Self { id, kind, record }
    }

    /// Take the serialized fields.
    pub fn into_record(self) -> JsonValue {
        self.record
    }
}

/// Generic attribute store the asset lifecycle persists into.
///
/// The repository enforces no schema. It only assigns identities and keeps
/// the latest serialized form of each record.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Insert (when `id` is `None`) or overwrite a record.
    ///
    /// Returns the record's identity, newly assigned on insert.
    async fn save(
        &self,
        id: Option<AssetId>,
        kind: AssetKind,
        record: &JsonValue,
    ) -> AtelierResult<AssetId>;

    /// Load a record by identity.
    async fn load(&self, id: AssetId) -> AtelierResult<Option<StoredRecord>>;

    /// Destroy a record. Removing an absent record is not an error.
    async fn remove(&self, id: AssetId) -> AtelierResult<()>;
}
