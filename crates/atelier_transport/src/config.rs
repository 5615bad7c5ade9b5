//! Transport configuration.
//!
//! Every backend this crate can build is a variant of [`TransportConfig`];
//! there is no loading of backends by name at runtime.

use crate::{HttpTransport, LocalTransport, MemoryTransport, Transport};
use atelier_error::AtelierResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Directory used by the fallback `local` transport.
pub const DEFAULT_LOCAL_DIRECTORY: &str = "data/www/media";

/// Locator prefix used when a config does not set one.
pub const DEFAULT_URL_PREFIX: &str = "/media";

fn default_url_prefix() -> String {
    DEFAULT_URL_PREFIX.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Configuration of one named transport.
///
/// # Example
///
/// ```toml
/// [transports.local]
/// kind = "local"
/// directory = "data/www/media"
/// url_prefix = "/media"
///
/// [transports.bucket]
/// kind = "http"
/// endpoint = "https://objects.internal/assets"
/// public_url = "https://cdn.example.com/assets"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Files on local disk
    Local {
        /// The base directory to store blobs in.
        directory: PathBuf,
        /// Prefix of returned locators.
        #[serde(default = "default_url_prefix")]
        url_prefix: String,
    },
    /// HTTP object store
    Http {
        /// Base URL blobs are written to.
        endpoint: String,
        /// Base URL handed to clients (defaults to `endpoint`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        public_url: Option<String>,
        /// Bearer token sent with every request.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bearer_token: Option<String>,
        /// Per-request timeout in seconds.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    /// In-process memory
    Memory {
        /// Prefix of returned locators.
        #[serde(default = "default_url_prefix")]
        url_prefix: String,
    },
}

impl TransportConfig {
    /// Configuration of the fallback `local` transport.
    pub fn fallback_local() -> Self {
        Self::Local {
            directory: PathBuf::from(DEFAULT_LOCAL_DIRECTORY),
            url_prefix: default_url_prefix(),
        }
    }

    /// Build the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the backend rejects its settings.
    pub fn connect(&self) -> AtelierResult<Arc<dyn Transport>> {
        match self {
            Self::Local {
                directory,
                url_prefix,
            } => Ok(Arc::new(LocalTransport::new(
                directory.clone(),
                url_prefix.clone(),
            )?)),
            Self::Http {
                endpoint,
                public_url,
                bearer_token,
                timeout_secs,
            } => Ok(Arc::new(HttpTransport::new(
                endpoint.clone(),
                public_url.clone(),
                bearer_token.clone(),
                Duration::from_secs(*timeout_secs),
            )?)),
            Self::Memory { url_prefix } => Ok(Arc::new(MemoryTransport::new(url_prefix.clone()))),
        }
    }
}
