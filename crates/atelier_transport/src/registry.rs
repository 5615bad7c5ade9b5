//! Name → transport lookup table.

use crate::{Transport, TransportConfig};
use atelier_error::{AssetError, AssetErrorKind, AtelierResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Name that always resolves, backed by local disk unless configured otherwise.
pub const FALLBACK_TRANSPORT: &str = "local";

/// Registry of transport instances, populated once at startup.
///
/// An asset fixes its transport name at first ingestion: the asset's own
/// `transport` field wins, then the registry default, then `local`.
///
/// # Example
///
/// ```
/// use atelier_transport::{MemoryTransport, TransportRegistry};
/// use std::sync::Arc;
///
/// let mut registry = TransportRegistry::new(Some("memory"));
/// registry.register("memory", Arc::new(MemoryTransport::default()));
///
/// assert_eq!(registry.resolve_name(None), "memory");
/// assert_eq!(registry.resolve_name(Some("local")), "local");
/// assert!(registry.get("memory").is_ok());
/// assert!(registry.get("gcs").is_err());
/// ```
#[derive(Clone, Default)]
pub struct TransportRegistry {
    transports: HashMap<String, Arc<dyn Transport>>,
    default: Option<String>,
}

impl TransportRegistry {
    /// Create an empty registry with an optional process-wide default name.
    pub fn new(default: Option<&str>) -> Self {
        Self {
            transports: HashMap::new(),
            default: default.map(str::to_string),
        }
    }

    /// Build every configured transport.
    ///
    /// A `local` entry is added from [`TransportConfig::fallback_local`] when
    /// the configuration does not define one.
    ///
    /// # Errors
    ///
    /// Returns the first backend construction error.
    #[tracing::instrument(skip(configs), fields(count = configs.len()))]
    pub fn from_configs(
        configs: &HashMap<String, TransportConfig>,
        default: Option<&str>,
    ) -> AtelierResult<Self> {
        let mut registry = Self::new(default);
        for (name, config) in configs {
            registry.register(name.clone(), config.connect()?);
        }
        if !registry.contains(FALLBACK_TRANSPORT) {
            registry.register(
                FALLBACK_TRANSPORT,
                TransportConfig::fallback_local().connect()?,
            );
        }
        Ok(registry)
    }

    /// Add or replace a transport.
    pub fn register(&mut self, name: impl Into<String>, transport: Arc<dyn Transport>) {
        let name = name.into();
        tracing::debug!(name = %name, backend = transport.backend(), "Registered transport");
        self.transports.insert(name, transport);
    }

    /// Whether a transport is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.transports.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.transports.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The configured default name, if any.
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Pick the transport name for an asset.
    pub fn resolve_name(&self, requested: Option<&str>) -> String {
        requested
            .or(self.default.as_deref())
            .unwrap_or(FALLBACK_TRANSPORT)
            .to_string()
    }

    /// Look up a transport by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTransport` when nothing is registered under `name`.
    pub fn get(&self, name: &str) -> AtelierResult<Arc<dyn Transport>> {
        self.transports
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::new(AssetErrorKind::UnknownTransport(name.to_string())).into())
    }
}

impl std::fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportRegistry")
            .field("transports", &self.names())
            .field("default", &self.default)
            .finish()
    }
}
