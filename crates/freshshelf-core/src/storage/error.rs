//! Storage error handling
//!
//! Typed errors for backend operations. None of these ever reach a caller of
//! `AppStorage`: they are logged and collapsed into "no value" there. They
//! exist so the lower layers can say *why* a backend refused an operation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::backend::Backend;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend cannot be used at all (disabled, restricted context, lock poisoned)
    #[error("{backend} storage is unavailable: {reason}")]
    BackendUnavailable { backend: Backend, reason: String },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error("Storage quota exceeded while writing to '{path}'")]
    QuotaExceeded {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read a stored value
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a stored value
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Key cannot be mapped onto the backend's namespace
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// Value could not be serialized or deserialized
    #[error("Serialization error for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, quota, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path,
                source: error,
            },
            _ if is_quota_error(&error) => StorageError::QuotaExceeded {
                path,
                source: error,
            },
            _ => StorageError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Shorthand for [`StorageError::BackendUnavailable`]
    pub fn unavailable(backend: Backend, reason: impl Into<String>) -> Self {
        StorageError::BackendUnavailable {
            backend,
            reason: reason.into(),
        }
    }
}

/// Check if an I/O error indicates a full disk or exhausted quota
fn is_quota_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
