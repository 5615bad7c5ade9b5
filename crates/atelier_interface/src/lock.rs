//! Lock contract.

use async_trait::async_trait;
use atelier_error::AtelierResult;

/// Named mutual-exclusion service.
///
/// Keys are fine-grained strings such as `"<asset id>:downloading"`.
#[async_trait]
pub trait Locker: Send + Sync {
    /// Wait for exclusive ownership of `key`.
    ///
    /// # Errors
    ///
    /// Returns `LockTimeout` when the lock could not be obtained.
    async fn lock(&self, key: &str) -> AtelierResult<LockGuard>;
}

/// Ownership of a named lock. Dropping it releases the lock.
pub struct LockGuard {
    key: String,
    _held: Box<dyn Send>,
}

impl LockGuard {
    /// Wrap whatever keeps the underlying lock held.
    pub fn new(key: impl Into<String>, held: impl Send + 'static) -> Self {
        Self {
            key: key.into(),
            _held: Box::new(held),
        }
    }

    /// The locked key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Release the lock now.
    pub fn release(self) {
        drop(self);
    }
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").field("key", &self.key).finish()
    }
}
