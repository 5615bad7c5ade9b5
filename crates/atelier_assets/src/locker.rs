//! In-process named locks.

use async_trait::async_trait;
use atelier_error::{AssetError, AssetErrorKind, AtelierResult};
use atelier_interface::{LockGuard, Locker};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default time to wait for a named lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Locker`] backed by one async mutex per key.
///
/// Only serialises callers inside this process. Entries for keys nobody holds
/// or waits on are pruned on the next acquisition.
#[derive(Debug)]
pub struct KeyedLocker {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    timeout: Duration,
}

impl KeyedLocker {
    /// Locker that gives up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    /// Number of keys currently held or waited on.
    pub fn active(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.values().filter(|m| Arc::strong_count(m) > 1).count()
    }

    fn entry(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.retain(|_, m| Arc::strong_count(m) > 1);
        locks.entry(key.to_string()).or_default().clone()
    }
}

impl Default for KeyedLocker {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

#[async_trait]
impl Locker for KeyedLocker {
    #[tracing::instrument(skip(self))]
    async fn lock(&self, key: &str) -> AtelierResult<LockGuard> {
        let mutex = self.entry(key);
        match tokio::time::timeout(self.timeout, mutex.lock_owned()).await {
            Ok(held) => {
                tracing::trace!("Acquired lock");
                Ok(LockGuard::new(key, held))
            }
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "Lock wait timed out");
                Err(AssetError::new(AssetErrorKind::LockTimeout(key.to_string())).into())
            }
        }
    }
}
