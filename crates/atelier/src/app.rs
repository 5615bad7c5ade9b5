//! Wiring of stores from configuration.

use crate::AtelierConfig;
use atelier_assets::{AssetStore, ImageStore, KeyedLocker, ScratchDir};
use atelier_interface::AssetRepository;
use std::sync::Arc;

/// Assembled file and image stores sharing one registry and repository.
#[derive(Debug, Clone)]
pub struct Atelier {
    images: ImageStore,
}

impl Atelier {
    /// Build transports from `config` and wire both stores over `repository`.
    ///
    /// # Errors
    ///
    /// Fails when a configured transport cannot be constructed.
    pub fn new(
        config: &AtelierConfig,
        repository: Arc<dyn AssetRepository>,
    ) -> atelier_error::AtelierResult<Self> {
        let registry = config.registry()?;
        tracing::info!(
            transports = ?registry.names(),
            default = %config.default_transport,
            "Configured transports"
        );

        let assets = AssetStore::new(
            Arc::new(registry),
            repository,
            ScratchDir::new(&config.scratch_dir),
        );
        let locker = Arc::new(KeyedLocker::new(config.lock_timeout()));
        Ok(Self {
            images: ImageStore::new(assets, locker),
        })
    }

    /// File store.
    pub fn assets(&self) -> &AssetStore {
        self.images.assets()
    }

    /// Image store.
    pub fn images(&self) -> &ImageStore {
        &self.images
    }
}
