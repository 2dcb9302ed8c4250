//! Key-value backends
//!
//! A backend stores UTF-8 text under a string key. Three implementations:
//!
//! - [`FileBackend`]: one file per key in a directory, written atomically
//! - [`MemoryBackend`]: a map that lives as long as the process
//! - [`UnavailableBackend`]: refuses every operation (disabled or restricted storage)
//!
//! Backends report failures as [`StorageError`]; deciding what to do about
//! them is the job of [`DualStore`](super::DualStore).

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::error::{StorageError, StorageResult};

/// File extension for stored values
const VALUE_EXTENSION: &str = "json";

/// Which of the two physical stores an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Survives restarts
    Durable,
    /// Lives only as long as the current session
    Ephemeral,
}

impl Backend {
    /// Both backends, in read-preference order
    pub const ALL: [Backend; 2] = [Backend::Durable, Backend::Ephemeral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Durable => "durable",
            Backend::Ephemeral => "ephemeral",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical key-value store holding raw text
pub trait KeyValueBackend: Send + Sync {
    /// Read the value under `key`, `Ok(None)` if it was never written
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Human-readable location, for status output
    fn describe(&self) -> String;
}

/// Reject keys that cannot be used as a plain file name
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\', '\0']) {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Backend storing each key as `<root>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn value_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, VALUE_EXTENSION)))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.value_path(key)?;

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(StorageError::from_io(e, path))
            }
            Err(e) => Err(StorageError::ReadError { path, source: e }),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.value_path(key)?;
        atomic_write(&path, value.as_bytes())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.value_path(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, path)),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Write data to a file atomically
///
/// Writes a sibling temp file, syncs it, then renames it over the target so
/// readers never observe a half-written value.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;

    Ok(())
}

/// In-process backend; contents vanish with the process
#[derive(Debug)]
pub struct MemoryBackend {
    role: Backend,
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new(role: Backend) -> Self {
        Self {
            role,
            values: Mutex::new(HashMap::new()),
        }
    }

    fn poisoned(&self) -> StorageError {
        StorageError::unavailable(self.role, "in-memory store lock poisoned")
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(Backend::Ephemeral)
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        let values = self.values.lock().map_err(|_| self.poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut values = self.values.lock().map_err(|_| self.poisoned())?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut values = self.values.lock().map_err(|_| self.poisoned())?;
        values.remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

/// Backend that refuses everything
///
/// Stands in for storage the environment will not let us use.
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    role: Backend,
    reason: String,
}

impl UnavailableBackend {
    pub fn new(role: Backend, reason: impl Into<String>) -> Self {
        Self {
            role,
            reason: reason.into(),
        }
    }

    fn refuse(&self) -> StorageError {
        StorageError::unavailable(self.role, self.reason.clone())
    }
}

impl KeyValueBackend for UnavailableBackend {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(self.refuse())
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(self.refuse())
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(self.refuse())
    }

    fn describe(&self) -> String {
        format!("unavailable ({})", self.reason)
    }
}
