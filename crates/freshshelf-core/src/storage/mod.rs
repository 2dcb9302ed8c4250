//! Storage layer
//!
//! Keeps one logical dataset across two independently failing backends.
//!
//! ## Architecture
//!
//! - **Backends**: physical key-value stores (`FileBackend`, `MemoryBackend`,
//!   `UnavailableBackend`) behind the `KeyValueBackend` trait
//! - **DualStore**: best-effort get/set/remove against one named backend
//! - **AppStorage**: JSON values written to both backends, read durable-first
//!
//! Storage errors stop at `AppStorage`; callers above it only ever see
//! "no value".

pub mod app;
pub mod backend;
pub mod dual;
pub mod error;

pub use app::{AppStorage, BackendStatus, Snapshots, WriteReport};
pub use backend::{Backend, FileBackend, KeyValueBackend, MemoryBackend, UnavailableBackend};
pub use dual::DualStore;
pub use error::{StorageError, StorageResult};
