//! Best-effort removal of assets and their blobs.

use crate::AssetStore;
use atelier_core::{BlobKey, Entity};
use atelier_error::AtelierResult;
use atelier_interface::HookEvent;

/// What happened to one blob during removal.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct RemovalOutcome {
    /// Key or label of the blob
    target: String,
    /// `Err` carries the swallowed failure message
    result: Result<(), String>,
}

impl RemovalOutcome {
    /// True when the blob was removed.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-blob results of a removal.
///
/// Blob failures never abort a removal; they are logged and collected here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    outcomes: Vec<RemovalOutcome>,
    record_removed: bool,
}

impl RemovalReport {
    /// Record the result of removing `target`.
    pub fn record(&mut self, target: impl Into<String>, result: AtelierResult<()>) {
        let target = target.into();
        let result = result.map_err(|e| {
            tracing::warn!(target = %target, error = %e, "Failed to remove blob");
            e.to_string()
        });
        self.outcomes.push(RemovalOutcome { target, result });
    }

    /// Every recorded outcome, in removal order.
    pub fn outcomes(&self) -> &[RemovalOutcome] {
        &self.outcomes
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &RemovalOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// True when every blob was removed.
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(RemovalOutcome::is_ok)
    }

    /// True when a persisted record was destroyed.
    pub fn record_removed(&self) -> bool {
        self.record_removed
    }
}

impl AssetStore {
    /// Remove `entity`: its primary blob, then its record.
    ///
    /// Blob failures (missing blob, backend down, unknown transport) are
    /// logged and reported but never stop the record from being destroyed.
    ///
    /// # Errors
    ///
    /// Only `before` hook and repository failures propagate.
    pub async fn remove<E: Entity>(&self, entity: &E) -> AtelierResult<RemovalReport> {
        self.remove_with(entity, RemovalReport::default()).await
    }

    /// Finish a removal that may already hold variant outcomes.
    #[tracing::instrument(skip_all, fields(kind = %E::KIND, id = ?entity.asset().id()))]
    pub(crate) async fn remove_with<E: Entity>(
        &self,
        entity: &E,
        mut report: RemovalReport,
    ) -> AtelierResult<RemovalReport> {
        let asset = entity.asset();
        self.hooks().before(HookEvent::FileRemove, asset).await?;

        let removed = match (BlobKey::primary(asset), self.transport_for(entity)) {
            (Ok(key), Ok(transport)) => {
                let target = key.to_string();
                (target, transport.remove(&key).await)
            }
            (Err(e), _) => ("primary".to_string(), Err(e)),
            (Ok(key), Err(e)) => (key.to_string(), Err(e)),
        };
        report.record(removed.0, removed.1);

        if let Some(id) = asset.id() {
            self.repository().remove(id).await?;
            report.record_removed = true;
        }

        if let Err(e) = self.hooks().after(HookEvent::FileRemove, asset).await {
            tracing::warn!(error = %e, "Post-removal hook failed");
        }

        tracing::info!(
            failures = report.failures().count(),
            record_removed = report.record_removed,
            "Removed asset"
        );
        Ok(report)
    }
}
