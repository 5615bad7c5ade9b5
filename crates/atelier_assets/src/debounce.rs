//! Shared-source debouncing for variant generation.
//!
//! Generating a variant needs the primary blob locally. While several variants
//! of one asset are in flight they share a single fetched copy: the first
//! request pulls it, each request holds a [`SourceLease`], and the last lease
//! released deletes the copy. The check-then-pull and the decrement-then-delete
//! both run under the `"<asset id>:downloading"` lock.

use atelier_core::AssetId;
use atelier_interface::Locker;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Lock key guarding the fetched source of `id`.
pub(crate) fn lock_key(id: AssetId) -> String {
    format!("{}:downloading", id)
}

/// In-flight variant requests per asset.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    counts: Mutex<HashMap<AssetId, usize>>,
}

impl InFlight {
    pub(crate) fn count(&self, id: AssetId) -> usize {
        let counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        counts.get(&id).copied().unwrap_or(0)
    }

    fn acquire(&self, id: AssetId) -> usize {
        let mut counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        let count = counts.entry(id).or_insert(0);
        *count += 1;
        *count
    }

    fn release(&self, id: AssetId) -> usize {
        let mut counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        match counts.get_mut(&id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                *count
            }
            Some(_) => {
                counts.remove(&id);
                0
            }
            None => 0,
        }
    }
}

/// Locker and in-flight table shared by every lease.
pub(crate) struct SourceDebounce {
    pub(crate) locker: Arc<dyn Locker>,
    pub(crate) in_flight: InFlight,
}

impl SourceDebounce {
    pub(crate) fn new(locker: Arc<dyn Locker>) -> Self {
        Self {
            locker,
            in_flight: InFlight::default(),
        }
    }
}

impl std::fmt::Debug for SourceDebounce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDebounce")
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

/// Claim on the fetched source of one asset.
///
/// Must be created while holding the asset's download lock. Release it with
/// [`release`](Self::release); a lease dropped without release schedules the
/// release on the current runtime.
#[derive(Debug)]
pub(crate) struct SourceLease {
    shared: Arc<SourceDebounce>,
    id: AssetId,
    path: PathBuf,
    released: bool,
}

impl SourceLease {
    /// Count one more request on `id`. Caller holds the download lock.
    pub(crate) fn acquire(shared: Arc<SourceDebounce>, id: AssetId, path: PathBuf) -> Self {
        let count = shared.in_flight.acquire(id);
        tracing::debug!(id = %id, in_flight = count, "Leased variant source");
        Self {
            shared,
            id,
            path,
            released: false,
        }
    }

    /// Drop the claim, deleting the source when it was the last one.
    ///
    /// The cleanup runs as its own task, so it completes even if the caller
    /// stops awaiting while the download lock is contended.
    pub(crate) async fn release(mut self) {
        self.released = true;
        let task = tokio::spawn(release_source(self.shared.clone(), self.id, self.path.clone()));
        if let Err(e) = task.await {
            tracing::warn!(id = %self.id, error = %e, "Variant source release task failed");
        }
    }
}

impl Drop for SourceLease {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        tracing::debug!(id = %self.id, "SourceLease dropped without release");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(release_source(self.shared.clone(), self.id, self.path.clone()));
            }
            Err(_) => {
                // No runtime to take the lock on; only fix the bookkeeping.
                let remaining = self.shared.in_flight.release(self.id);
                tracing::warn!(
                    id = %self.id,
                    remaining,
                    path = %self.path.display(),
                    "Released variant source outside a runtime; source file left in place"
                );
            }
        }
    }
}

async fn release_source(shared: Arc<SourceDebounce>, id: AssetId, path: PathBuf) {
    let key = lock_key(id);
    let guard = match shared.locker.lock(&key).await {
        Ok(guard) => Some(guard),
        Err(e) => {
            tracing::warn!(id = %id, error = %e, "Releasing variant source without the download lock");
            None
        }
    };

    let remaining = shared.in_flight.release(id);
    if remaining == 0 {
        if guard.is_some() {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(id = %id, path = %path.display(), "Removed variant source"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(id = %id, path = %path.display(), error = %e, "Failed to remove variant source")
                }
            }
        } else {
            tracing::warn!(id = %id, path = %path.display(), "Source file left in place");
        }
    } else {
        tracing::debug!(id = %id, in_flight = remaining, "Variant source still in use");
    }
    drop(guard);
}
