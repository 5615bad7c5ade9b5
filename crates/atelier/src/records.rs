//! Record persistence in plain JSON files.
//!
//! Each record lives in `{dir}/{id}.json` as `{"kind": ..., "record": {...}}`.
//! Writes go through a temp file and a rename so readers never see a torn
//! record.

use async_trait::async_trait;
use atelier_core::{AssetId, AssetKind};
use atelier_error::{AssetError, AtelierResult, JsonError};
use atelier_interface::{AssetRepository, StoredRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize)]
struct RecordFile {
    kind: AssetKind,
    record: JsonValue,
}

/// [`AssetRepository`] storing one JSON file per record.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    /// Repository rooted at `dir`, created if missing.
    pub fn new(dir: impl Into<PathBuf>) -> AtelierResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| AssetError::io(dir.display(), e))?;
        Ok(Self { dir })
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: AssetId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

#[async_trait]
impl AssetRepository for JsonFileRepository {
    #[tracing::instrument(skip(self, record))]
    async fn save(
        &self,
        id: Option<AssetId>,
        kind: AssetKind,
        record: &JsonValue,
    ) -> AtelierResult<AssetId> {
        let id = id.unwrap_or_else(AssetId::generate);
        let body = serde_json::to_vec_pretty(&RecordFile {
            kind,
            record: record.clone(),
        })
        .map_err(|e| JsonError::new(e.to_string()))?;

        let path = self.path(id);
        let temp = path.with_extension("json.tmp");
        tokio::fs::write(&temp, &body)
            .await
            .map_err(|e| AssetError::io(temp.display(), e))?;
        tokio::fs::rename(&temp, &path)
            .await
            .map_err(|e| AssetError::io(path.display(), e))?;

        tracing::debug!(id = %id, path = %path.display(), "Wrote record");
        Ok(id)
    }

    async fn load(&self, id: AssetId) -> AtelierResult<Option<StoredRecord>> {
        let path = self.path(id);
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AssetError::io(path.display(), e).into()),
        };
        let file: RecordFile = serde_json::from_slice(&body)
            .map_err(|e| JsonError::new(format!("{}: {}", path.display(), e)))?;
        Ok(Some(StoredRecord::new(id, file.kind, file.record)))
    }

    async fn remove(&self, id: AssetId) -> AtelierResult<()> {
        let path = self.path(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(id = %id, "Removed record");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AssetError::io(path.display(), e).into()),
        }
    }
}
