//! Trait definitions for the collaborators the asset store calls into.
//!
//! The asset lifecycle never talks to a database, an event system or a lock
//! service directly. It consumes three narrow contracts:
//!
//! - [`AssetRepository`] persists records as opaque JSON objects
//! - [`AssetHook`] lets listeners intercept ingestion and removal
//! - [`Locker`] hands out named mutual-exclusion guards

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod hook;
mod lock;
mod repository;

pub use hook::{AssetHook, HookEvent};
pub use lock::{LockGuard, Locker};
pub use repository::{AssetRepository, StoredRecord};
