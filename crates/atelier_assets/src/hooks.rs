//! Lifecycle hook dispatch.

use atelier_core::Asset;
use atelier_error::AtelierResult;
use atelier_interface::{AssetHook, HookEvent};
use std::sync::Arc;

/// Ordered set of [`AssetHook`]s run around lifecycle operations.
///
/// Hooks run in registration order. The first error from a `before` hook
/// aborts the operation; `after` hooks only run once the body succeeded.
#[derive(Clone, Default)]
pub struct HookBus {
    hooks: Vec<Arc<dyn AssetHook>>,
}

impl HookBus {
    /// Empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook.
    pub fn register(&mut self, hook: Arc<dyn AssetHook>) {
        self.hooks.push(hook);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, hook: Arc<dyn AssetHook>) -> Self {
        self.register(hook);
        self
    }

    /// Number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// True when no hook is registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every `before` hook for `event`.
    pub async fn before(&self, event: HookEvent, asset: &Asset) -> AtelierResult<()> {
        for hook in &self.hooks {
            hook.before(event, asset).await?;
        }
        Ok(())
    }

    /// Run every `after` hook for `event`.
    pub async fn after(&self, event: HookEvent, asset: &Asset) -> AtelierResult<()> {
        for hook in &self.hooks {
            hook.after(event, asset).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for HookBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookBus").field("hooks", &self.hooks.len()).finish()
    }
}
