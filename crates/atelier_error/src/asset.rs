//! Asset lifecycle error types.

/// Kinds of asset lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AssetErrorKind {
    /// Source file does not exist
    #[display("Source not found: {}", _0)]
    NotFound(String),
    /// Input bytes are not a decodable image
    #[display("Failed to decode image: {}", _0)]
    DecodeFailure(String),
    /// Named lock could not be acquired in time
    #[display("Timed out acquiring lock: {}", _0)]
    LockTimeout(String),
    /// Variant name is not usable as a storage key
    #[display("Invalid variant name: {}", _0)]
    InvalidVariant(String),
    /// Variant is not registered on the asset
    #[display("Unknown variant: {}", _0)]
    UnknownVariant(String),
    /// No transport registered under the name
    #[display("Unknown transport: {}", _0)]
    UnknownTransport(String),
    /// Variant handle committed to a different asset than it was prepared for
    #[display("Variant prepared for another asset: {}", _0)]
    WrongAsset(String),
    /// Operation requires an asset that has been ingested and saved
    #[display("Asset has not been persisted")]
    NotPersisted,
    /// Local scratch filesystem failure
    #[display("Scratch I/O failed: {}", _0)]
    Io(String),
}

/// Asset error with location tracking.
///
/// # Examples
///
/// ```
/// use atelier_error::{AssetError, AssetErrorKind};
///
/// let err = AssetError::new(AssetErrorKind::DecodeFailure("not a png".to_string()));
/// assert!(format!("{}", err).contains("decode"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Asset Error: {} at line {} in {}", kind, line, file)]
pub struct AssetError {
    /// The kind of error that occurred
    pub kind: AssetErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AssetError {
    /// Create a new asset error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a scratch I/O failure on `path`.
    #[track_caller]
    pub fn io(path: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Self::new(AssetErrorKind::Io(format!("{}: {}", path, err)))
    }
}
