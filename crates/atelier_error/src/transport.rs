//! Transport (storage backend) error types.

/// Kinds of transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TransportErrorKind {
    /// No blob stored under the key
    #[display("Blob not found: {}", _0)]
    NotFound(String),
    /// Backend I/O failed during push, pull or remove
    #[display("Transport failure: {}", _0)]
    Failure(String),
    /// Key cannot be mapped onto the backend
    #[display("Invalid key: {}", _0)]
    InvalidKey(String),
    /// Invalid backend configuration
    #[display("Invalid configuration: {}", _0)]
    InvalidConfig(String),
}

/// Transport error with location tracking.
///
/// # Examples
///
/// ```
/// use atelier_error::{TransportError, TransportErrorKind};
///
/// let err = TransportError::new(TransportErrorKind::NotFound("abc.png".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", kind, line, file)]
pub struct TransportError {
    /// The kind of error that occurred
    pub kind: TransportErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TransportError {
    /// Create a new transport error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a backend I/O failure.
    #[track_caller]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Failure(message.into()))
    }

    /// Shorthand for a missing key.
    #[track_caller]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::NotFound(key.into()))
    }
}
