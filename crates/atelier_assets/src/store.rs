//! The asset store and its persistence helpers.

use crate::{HookBus, ScratchDir};
use atelier_core::{AssetId, AssetKind, BlobKey, Entity};
use atelier_error::{AssetError, AssetErrorKind, AtelierResult, JsonError};
use atelier_interface::AssetRepository;
use atelier_transport::{Transport, TransportRegistry};
use std::sync::Arc;

/// Lifecycle service for plain files.
///
/// Ingestion, URL resolution, removal and projection all go through here.
/// [`ImageStore`](crate::ImageStore) composes one and reuses the same routines
/// for images. Cloning is cheap; clones share the registry, repository and
/// hooks.
#[derive(Clone)]
pub struct AssetStore {
    registry: Arc<TransportRegistry>,
    repository: Arc<dyn AssetRepository>,
    scratch: ScratchDir,
    hooks: HookBus,
    http: reqwest::Client,
}

impl AssetStore {
    /// Create a store over a transport registry, a record repository and a
    /// scratch area.
    pub fn new(
        registry: Arc<TransportRegistry>,
        repository: Arc<dyn AssetRepository>,
        scratch: ScratchDir,
    ) -> Self {
        Self {
            registry,
            repository,
            scratch,
            hooks: HookBus::default(),
            http: reqwest::Client::new(),
        }
    }

    /// Replace the lifecycle hooks.
    pub fn with_hooks(mut self, hooks: HookBus) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replace the client used by [`from_url`](Self::from_url).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Transport registry.
    pub fn registry(&self) -> &TransportRegistry {
        &self.registry
    }

    /// Scratch area.
    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Lifecycle hooks.
    pub fn hooks(&self) -> &HookBus {
        &self.hooks
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Transport instance that owns `entity`.
    ///
    /// Uses the entity's recorded transport name, else the registry default,
    /// else the fallback local transport.
    pub fn transport_for<E: Entity>(&self, entity: &E) -> AtelierResult<Arc<dyn Transport>> {
        let name = self.registry.resolve_name(entity.asset().transport());
        self.registry.get(&name)
    }

    /// Persist `entity`, assigning its identity on first save.
    #[tracing::instrument(skip_all, fields(kind = %E::KIND))]
    pub async fn save<E: Entity>(&self, entity: &mut E) -> AtelierResult<AssetId> {
        let record = serde_json::to_value(&*entity).map_err(|e| JsonError::new(e.to_string()))?;
        let id = self
            .repository
            .save(entity.asset().id(), E::KIND, &record)
            .await?;
        entity.asset_mut().assign_id(id);
        tracing::debug!(id = %id, "Saved record");
        Ok(id)
    }

    /// Load a persisted entity by identity.
    ///
    /// # Errors
    ///
    /// `NotFound` when no record exists under `id`.
    pub async fn load<E: Entity>(&self, id: AssetId) -> AtelierResult<E> {
        let stored = self
            .repository
            .load(id)
            .await?
            .ok_or_else(|| AssetError::new(AssetErrorKind::NotFound(format!("record {}", id))))?;
        if *stored.kind() != E::KIND {
            tracing::debug!(id = %id, stored = %stored.kind(), requested = %E::KIND, "Loading record as a different kind");
        }
        let mut entity: E = serde_json::from_value(stored.into_record())
            .map_err(|e| JsonError::new(e.to_string()))?;
        entity.asset_mut().assign_id(id);
        Ok(entity)
    }

    /// Flavour of the record stored under `id`.
    pub async fn kind_of(&self, id: AssetId) -> AtelierResult<AssetKind> {
        self.repository
            .load(id)
            .await?
            .map(|stored| *stored.kind())
            .ok_or_else(|| AssetError::new(AssetErrorKind::NotFound(format!("record {}", id))).into())
    }

    /// Locator of the primary blob, or of `variant` when given.
    ///
    /// Neither the blob nor the variant registration is checked.
    pub async fn url<E: Entity>(&self, entity: &E, variant: Option<&str>) -> AtelierResult<String> {
        let key = BlobKey::for_asset(entity.asset(), variant)?;
        self.transport_for(entity)?.url(&key).await
    }

    pub(crate) fn repository(&self) -> &dyn AssetRepository {
        self.repository.as_ref()
    }
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("registry", &self.registry)
            .field("scratch", &self.scratch)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
