//! Best-effort access to the durable and ephemeral backends
//!
//! `DualStore` addresses each backend individually and never panics or
//! propagates a read failure. Writes hand back the backend's `Result` so the
//! caller can aggregate them; every failure is logged here first.

use tracing::{debug, warn};

use super::backend::{Backend, KeyValueBackend};
use super::error::StorageResult;

/// The pair of physical stores behind [`AppStorage`](super::AppStorage)
pub struct DualStore {
    durable: Box<dyn KeyValueBackend>,
    ephemeral: Box<dyn KeyValueBackend>,
}

impl DualStore {
    pub fn new(durable: Box<dyn KeyValueBackend>, ephemeral: Box<dyn KeyValueBackend>) -> Self {
        Self { durable, ephemeral }
    }

    fn backend(&self, backend: Backend) -> &dyn KeyValueBackend {
        match backend {
            Backend::Durable => self.durable.as_ref(),
            Backend::Ephemeral => self.ephemeral.as_ref(),
        }
    }

    /// Store raw text under `key` in one backend
    pub fn write(&self, backend: Backend, key: &str, raw: &str) -> StorageResult<()> {
        let result = self.backend(backend).set(key, raw);
        if let Err(ref e) = result {
            warn!(%backend, key, error = %e, "write failed");
        }
        result
    }

    /// Read raw text under `key` from one backend
    ///
    /// Missing keys and backend failures both come back as `None`.
    pub fn read(&self, backend: Backend, key: &str) -> Option<String> {
        match self.backend(backend).get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(%backend, key, error = %e, "read failed");
                None
            }
        }
    }

    /// Remove `key` from one backend, ignoring failures
    pub fn remove(&self, backend: Backend, key: &str) {
        if let Err(e) = self.backend(backend).remove(key) {
            debug!(%backend, key, error = %e, "remove failed");
        }
    }

    /// Check whether a backend currently accepts writes and reads them back
    pub fn probe(&self, backend: Backend, probe_key: &str) -> bool {
        let store = self.backend(backend);
        let ok = store.set(probe_key, "probe").is_ok()
            && matches!(store.get(probe_key), Ok(Some(ref v)) if v == "probe");
        let _ = store.remove(probe_key);
        ok
    }

    /// Location of a backend, for display
    pub fn describe(&self, backend: Backend) -> String {
        self.backend(backend).describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::{MemoryBackend, UnavailableBackend};

    fn healthy() -> DualStore {
        DualStore::new(
            Box::new(MemoryBackend::new(Backend::Durable)),
            Box::new(MemoryBackend::new(Backend::Ephemeral)),
        )
    }

    #[test]
    fn test_backends_are_independent() {
        let store = healthy();

        store.write(Backend::Durable, "k", "durable").unwrap();
        assert_eq!(store.read(Backend::Durable, "k").as_deref(), Some("durable"));
        assert_eq!(store.read(Backend::Ephemeral, "k"), None);

        store.write(Backend::Ephemeral, "k", "ephemeral").unwrap();
        assert_eq!(store.read(Backend::Durable, "k").as_deref(), Some("durable"));
        assert_eq!(
            store.read(Backend::Ephemeral, "k").as_deref(),
            Some("ephemeral")
        );

        store.remove(Backend::Durable, "k");
        assert_eq!(store.read(Backend::Durable, "k"), None);
        assert!(store.read(Backend::Ephemeral, "k").is_some());
    }

    #[test]
    fn test_failures_are_absorbed() {
        let store = DualStore::new(
            Box::new(UnavailableBackend::new(Backend::Durable, "blocked")),
            Box::new(MemoryBackend::new(Backend::Ephemeral)),
        );

        assert!(store.write(Backend::Durable, "k", "v").is_err());
        assert_eq!(store.read(Backend::Durable, "k"), None);
        store.remove(Backend::Durable, "k");

        assert!(store.write(Backend::Ephemeral, "k", "v").is_ok());
    }

    #[test]
    fn test_probe() {
        let store = DualStore::new(
            Box::new(UnavailableBackend::new(Backend::Durable, "blocked")),
            Box::new(MemoryBackend::new(Backend::Ephemeral)),
        );

        assert!(!store.probe(Backend::Durable, "probe"));
        assert!(store.probe(Backend::Ephemeral, "probe"));
        // Probe cleans up after itself
        assert_eq!(store.read(Backend::Ephemeral, "probe"), None);
    }
}
