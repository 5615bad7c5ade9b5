//! Top-level error wrapper types.

use crate::{
    AssetError, AssetErrorKind, ConfigError, HttpError, JsonError, TransportError,
    TransportErrorKind,
};

/// Every error condition surfaced by the Atelier crates.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: AtelierError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AtelierErrorKind {
    /// Asset lifecycle error
    #[from(AssetError)]
    Asset(AssetError),
    /// Storage backend error
    #[from(TransportError)]
    Transport(TransportError),
    /// HTTP error while fetching a remote source
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Atelier error with kind discrimination.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierResult, ConfigError};
///
/// fn might_fail() -> AtelierResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Atelier Error: {}", _0)]
pub struct AtelierError(Box<AtelierErrorKind>);

impl AtelierError {
    /// Create a new error from a kind.
    pub fn new(kind: AtelierErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AtelierErrorKind {
        &self.0
    }

    /// True when a source file or a backend key was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind(),
            AtelierErrorKind::Asset(AssetError {
                kind: AssetErrorKind::NotFound(_),
                ..
            }) | AtelierErrorKind::Transport(TransportError {
                kind: TransportErrorKind::NotFound(_),
                ..
            })
        )
    }

    /// The asset error kind, if this wraps one.
    pub fn asset_kind(&self) -> Option<&AssetErrorKind> {
        match self.kind() {
            AtelierErrorKind::Asset(e) => Some(&e.kind),
            _ => None,
        }
    }

    /// The transport error kind, if this wraps one.
    pub fn transport_kind(&self) -> Option<&TransportErrorKind> {
        match self.kind() {
            AtelierErrorKind::Transport(e) => Some(&e.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to AtelierErrorKind
impl<T> From<T> for AtelierError
where
    T: Into<AtelierErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Atelier operations.
pub type AtelierResult<T> = std::result::Result<T, AtelierError>;
