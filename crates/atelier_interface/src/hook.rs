//! Hook contract.

use async_trait::async_trait;
use atelier_core::Asset;
use atelier_error::AtelierResult;

/// Lifecycle points listeners can intercept.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::IntoStaticStr,
    derive_more::Display,
)]
pub enum HookEvent {
    /// Wraps the primary push and first save of an ingestion
    #[display("file.create")]
    #[strum(serialize = "file.create")]
    FileCreate,
    /// Wraps primary blob removal and record destruction
    #[display("file.remove")]
    #[strum(serialize = "file.remove")]
    FileRemove,
    /// Runs before an image's variants are removed
    #[display("image.remove")]
    #[strum(serialize = "image.remove")]
    ImageRemove,
}

/// Listener invoked around lifecycle events.
///
/// Both methods default to no-ops. An error from `before` aborts the wrapped
/// operation; an error from `after` is reported to the caller once the
/// operation has already happened.
#[async_trait]
pub trait AssetHook: Send + Sync {
    /// Called before the wrapped body runs.
    async fn before(&self, _event: HookEvent, _asset: &Asset) -> AtelierResult<()> {
        Ok(())
    }

    /// Called after the wrapped body succeeded.
    async fn after(&self, _event: HookEvent, _asset: &Asset) -> AtelierResult<()> {
        Ok(())
    }
}
