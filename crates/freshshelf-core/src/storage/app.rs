//! One logical store over two backends
//!
//! `AppStorage` serializes values to JSON text once and writes that text to
//! both backends independently. Reads prefer the durable backend and fall
//! back to the ephemeral one.
//!
//! Nothing here returns an error. Missing data, corrupted data and
//! unavailable backends all read as `None`; writes report which backends
//! accepted them through [`WriteReport`] and carry on regardless.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::backend::{Backend, KeyValueBackend};
use super::dual::DualStore;
use super::error::StorageError;

/// Key used by [`AppStorage::status`] to probe the backends
const PROBE_KEY: &str = "freshShelfProbe";

/// Suffix of the key holding a collection's version stamp
const VERSION_SUFFIX: &str = "version";

/// Which backends accepted a write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReport {
    pub durable: bool,
    pub ephemeral: bool,
    /// The collection's version moved between load and save
    #[serde(default)]
    pub conflict: bool,
}

impl WriteReport {
    /// At least one backend holds the new value
    pub fn is_persisted(&self) -> bool {
        self.durable || self.ephemeral
    }

    /// Only one backend holds the new value
    pub fn is_partial(&self) -> bool {
        self.durable != self.ephemeral
    }
}

/// Availability of each backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub durable_available: bool,
    pub ephemeral_available: bool,
    pub durable_location: String,
    pub ephemeral_location: String,
}

/// Snapshot of one key as each backend holds it
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshots<T> {
    pub durable: Option<T>,
    pub ephemeral: Option<T>,
}

/// Single logical key-value store backed by a [`DualStore`]
pub struct AppStorage {
    dual: DualStore,
}

impl AppStorage {
    pub fn new(dual: DualStore) -> Self {
        Self { dual }
    }

    /// Build from two backends
    pub fn with_backends(
        durable: Box<dyn KeyValueBackend>,
        ephemeral: Box<dyn KeyValueBackend>,
    ) -> Self {
        Self::new(DualStore::new(durable, ephemeral))
    }

    /// Read the raw text for `key`, durable first
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.dual
            .read(Backend::Durable, key)
            .or_else(|| self.dual.read(Backend::Ephemeral, key))
    }

    /// Read `key` as untyped JSON
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.get(key)
    }

    /// Read and deserialize `key`
    ///
    /// Returns `None` if neither backend has the key, if both fail, or if the
    /// stored text does not deserialize into `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        decode(key, &raw)
    }

    /// Read `key` from each backend separately
    ///
    /// Used when the two copies may have diverged and need reconciling.
    pub fn read_both<T: DeserializeOwned>(&self, key: &str) -> Snapshots<T> {
        let durable = self
            .dual
            .read(Backend::Durable, key)
            .and_then(|raw| decode(key, &raw));
        let ephemeral = self
            .dual
            .read(Backend::Ephemeral, key)
            .and_then(|raw| decode(key, &raw));
        Snapshots { durable, ephemeral }
    }

    /// Serialize `value` once and write it to both backends
    ///
    /// A failure on one backend does not stop the write to the other, and
    /// nothing is rolled back.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> WriteReport {
        let Some(raw) = encode(key, value) else {
            return WriteReport::default();
        };

        let report = WriteReport {
            durable: self.dual.write(Backend::Durable, key, &raw).is_ok(),
            ephemeral: self.dual.write(Backend::Ephemeral, key, &raw).is_ok(),
            conflict: false,
        };

        if !report.is_persisted() {
            warn!(key, "value was not stored in any backend");
        } else if report.is_partial() {
            debug!(key, ?report, "value stored in one backend only");
        }

        report
    }

    /// Serialize `value` and write it to the ephemeral backend only
    pub fn set_ephemeral<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        encode(key, value)
            .map(|raw| self.dual.write(Backend::Ephemeral, key, &raw).is_ok())
            .unwrap_or(false)
    }

    /// Read `key` from the ephemeral backend only
    pub fn get_ephemeral<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.dual.read(Backend::Ephemeral, key)?;
        decode(key, &raw)
    }

    /// Remove `key` from both backends
    pub fn remove(&self, key: &str) {
        for backend in Backend::ALL {
            self.dual.remove(backend, key);
        }
    }

    /// Remove `key` from the ephemeral backend only
    pub fn remove_ephemeral(&self, key: &str) {
        self.dual.remove(Backend::Ephemeral, key);
    }

    // ==================== Version Stamps ====================

    /// Current version stamp of the collection stored under `key`
    ///
    /// A collection that has never been stamped is at version 0. The stamp
    /// is read from each backend and the higher one wins, so a backend that
    /// stopped accepting writes cannot hold the stamp back.
    pub fn version(&self, key: &str) -> u64 {
        let stamps = self.read_both::<u64>(&version_key(key));
        stamps
            .durable
            .into_iter()
            .chain(stamps.ephemeral)
            .max()
            .unwrap_or(0)
    }

    /// Increment the version stamp of `key` and return the new value
    pub fn bump_version(&self, key: &str) -> u64 {
        let next = self.version(key).saturating_add(1);
        self.set(&version_key(key), &next);
        next
    }

    /// Remove the version stamp of `key`
    pub fn clear_version(&self, key: &str) {
        self.remove(&version_key(key));
    }

    // ==================== Diagnostics ====================

    /// Probe both backends
    pub fn status(&self) -> BackendStatus {
        BackendStatus {
            durable_available: self.dual.probe(Backend::Durable, PROBE_KEY),
            ephemeral_available: self.dual.probe(Backend::Ephemeral, PROBE_KEY),
            durable_location: self.dual.describe(Backend::Durable),
            ephemeral_location: self.dual.describe(Backend::Ephemeral),
        }
    }
}

fn version_key(key: &str) -> String {
    format!("{}.{}", key, VERSION_SUFFIX)
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(raw) => Some(raw),
        Err(source) => {
            let err = StorageError::Serialization {
                key: key.to_string(),
                source,
            };
            warn!(error = %err, "failed to serialize value");
            None
        }
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(source) => {
            let err = StorageError::Serialization {
                key: key.to_string(),
                source,
            };
            warn!(error = %err, "failed to parse stored value");
            None
        }
    }
}
