//! Configuration for the Atelier store.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from atelier.toml)
//! - User overrides (~/.config/atelier/atelier.toml, then ./atelier.toml)
//! - Automatic merging with user values taking precedence

use atelier_error::{AtelierError, AtelierResult, ConfigError};
use atelier_transport::{TransportConfig, TransportRegistry};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../atelier.toml");

/// Store configuration.
///
/// # Example
///
/// ```toml
/// default_transport = "bucket"
/// lock_timeout_ms = 10000
///
/// [transports.bucket]
/// kind = "http"
/// endpoint = "https://objects.example.com/media"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AtelierConfig {
    /// Transport for assets that do not name one
    #[serde(default = "default_transport")]
    pub default_transport: String,

    /// Scratch directory for transient files
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// Directory of the CLI's record files
    #[serde(default = "default_records_dir")]
    pub records_dir: PathBuf,

    /// Timeout for named locks, in milliseconds
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json_logs: bool,

    /// Named transport instances
    #[serde(default)]
    pub transports: HashMap<String, TransportConfig>,
}

fn default_transport() -> String {
    atelier_transport::FALLBACK_TRANSPORT.to_string()
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("data/cache/tmp")
}

fn default_records_dir() -> PathBuf {
    PathBuf::from("data/records")
}

fn default_lock_timeout_ms() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AtelierConfig {
    fn default() -> Self {
        Self {
            default_transport: default_transport(),
            scratch_dir: default_scratch_dir(),
            records_dir: default_records_dir(),
            lock_timeout_ms: default_lock_timeout_ms(),
            log_level: default_log_level(),
            json_logs: false,
            transports: HashMap::new(),
        }
    }
}

impl AtelierConfig {
    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    #[instrument]
    pub fn load() -> AtelierResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/atelier/atelier.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("atelier").required(false));

        builder
            .build()
            .map_err(|e| {
                AtelierError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AtelierError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration from one file, on top of the bundled defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> AtelierResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                AtelierError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AtelierError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Lock timeout as a duration.
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Build every configured transport.
    pub fn registry(&self) -> AtelierResult<TransportRegistry> {
        TransportRegistry::from_configs(&self.transports, Some(&self.default_transport))
    }
}
