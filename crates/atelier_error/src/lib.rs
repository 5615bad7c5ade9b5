//! Error types for the Atelier asset store.
//!
//! This crate provides the foundation error types used throughout the Atelier workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use atelier_error::{AtelierResult, AssetError, AssetErrorKind};
//!
//! fn ingest() -> AtelierResult<()> {
//!     Err(AssetError::new(AssetErrorKind::NotFound("/tmp/missing.png".to_string())))?
//! }
//!
//! let err = ingest().unwrap_err();
//! assert!(err.is_not_found());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod config;
mod error;
mod http;
mod json;
mod transport;

pub use asset::{AssetError, AssetErrorKind};
pub use config::ConfigError;
pub use error::{AtelierError, AtelierErrorKind, AtelierResult};
pub use http::HttpError;
pub use json::JsonError;
pub use transport::{TransportError, TransportErrorKind};
