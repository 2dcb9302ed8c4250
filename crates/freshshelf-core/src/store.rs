//! Unified storage interface
//!
//! The `Store` wires configuration to the two backends and hands out the
//! typed collection stores. It owns the only `AppStorage`; nothing in the
//! crate keeps collections in global state.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::open()?;
//!
//! store.users().register("alice", "secret")?;
//! store.items().add(Item::new("Milk", Category::Dairy, expiry))?;
//!
//! let shelf = store.items().load_all();
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::config::Config;
use crate::items::{ItemStore, ITEMS_KEY, SELECTED_CATEGORY_KEY};
use crate::models::{ExpiryStatus, Item};
use crate::recipes::{self, RecipeMatch};
use crate::storage::{
    AppStorage, Backend, BackendStatus, FileBackend, KeyValueBackend, MemoryBackend,
    UnavailableBackend,
};
use crate::users::{UserStore, CURRENT_USER_KEY, USERS_KEY};

/// Entry point for FreshShelf data
pub struct Store {
    storage: AppStorage,
    config: Config,
}

impl Store {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(config))
    }

    /// Open the store with a specific configuration
    ///
    /// Never fails: a backend that cannot be used is replaced by one that
    /// refuses every operation, and the other backend carries on alone.
    pub fn open_with_config(config: Config) -> Self {
        let durable: Box<dyn KeyValueBackend> = if config.durable_enabled {
            Box::new(FileBackend::new(config.durable_store_path()))
        } else {
            Box::new(UnavailableBackend::new(
                Backend::Durable,
                "disabled by configuration",
            ))
        };

        let ephemeral: Box<dyn KeyValueBackend> = match config.session_store_path() {
            Some(path) => Box::new(FileBackend::new(path)),
            None => Box::new(MemoryBackend::new(Backend::Ephemeral)),
        };

        debug!(
            durable = %durable.describe(),
            ephemeral = %ephemeral.describe(),
            "opening store"
        );

        Self {
            storage: AppStorage::with_backends(durable, ephemeral),
            config,
        }
    }

    /// Open a store whose backends both live in memory
    pub fn in_memory() -> Self {
        Self {
            storage: AppStorage::with_backends(
                Box::new(MemoryBackend::new(Backend::Durable)),
                Box::new(MemoryBackend::new(Backend::Ephemeral)),
            ),
            config: Config {
                session_in_memory: true,
                ..Config::default()
            },
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The logical key-value store
    pub fn storage(&self) -> &AppStorage {
        &self.storage
    }

    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.storage)
    }

    pub fn items(&self) -> ItemStore<'_> {
        ItemStore::new(&self.storage)
    }

    /// Availability of each backend
    pub fn status(&self) -> BackendStatus {
        self.storage.status()
    }

    /// Expiry status of an item as of today
    pub fn item_status(&self, item: &Item, today: NaiveDate) -> ExpiryStatus {
        item.status(today, self.config.expiring_soon_days)
    }

    /// Today's date in local time
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Recipe suggestions for the current shelf
    ///
    /// Reads the reconciled item list; when `selected_only` is set and a
    /// category is selected, only that category's items are considered.
    pub fn suggest_recipes(&self, selected_only: bool) -> Vec<RecipeMatch> {
        let items = self.items();
        let mut shelf = items.load_merged();

        if selected_only {
            if let Some(category) = items.selected_category() {
                shelf = ItemStore::list_by_category(&shelf, category);
            }
        }

        recipes::suggest(&shelf)
    }

    /// Remove every persisted key from both backends
    pub fn clear_all(&self) {
        for key in [USERS_KEY, ITEMS_KEY, CURRENT_USER_KEY] {
            self.storage.remove(key);
        }
        self.storage.clear_version(USERS_KEY);
        self.storage.clear_version(ITEMS_KEY);
        self.storage.remove_ephemeral(SELECTED_CATEGORY_KEY);
        info!("cleared all stored data");
    }
}
