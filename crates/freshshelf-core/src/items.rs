//! Item collection
//!
//! Items are stored as one list under [`ITEMS_KEY`] and identified by `id`.
//! Every mutation loads the list, changes it in memory, and writes the whole
//! list back.

use std::cell::Cell;

use tracing::{debug, info, warn};

use crate::error::{DomainError, DomainResult};
use crate::models::{Category, Item};
use crate::reconcile::merge_snapshots;
use crate::storage::{AppStorage, WriteReport};

/// Storage key of the item list
pub const ITEMS_KEY: &str = "freshShelfItems";

/// Ephemeral-only key of the last selected category
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Typed access to the persisted item list
pub struct ItemStore<'a> {
    storage: &'a AppStorage,
    loaded_version: Cell<Option<u64>>,
    last_report: Cell<Option<WriteReport>>,
}

impl<'a> ItemStore<'a> {
    pub fn new(storage: &'a AppStorage) -> Self {
        Self {
            storage,
            loaded_version: Cell::new(None),
            last_report: Cell::new(None),
        }
    }

    /// Load every item; missing or unreadable data is an empty list
    pub fn load_all(&self) -> Vec<Item> {
        self.loaded_version.set(Some(self.storage.version(ITEMS_KEY)));
        self.storage.get(ITEMS_KEY).unwrap_or_default()
    }

    /// Load items, reconciling the two backends if the logical read is empty
    ///
    /// When the durable copy is missing or empty while the ephemeral copy
    /// (or vice versa) holds items, the two are merged by id with the
    /// ephemeral copy winning.
    pub fn load_merged(&self) -> Vec<Item> {
        let items = self.load_all();
        if !items.is_empty() {
            return items;
        }

        let snapshots = self.storage.read_both::<Vec<Item>>(ITEMS_KEY);
        let merged = merge_snapshots(snapshots.durable, snapshots.ephemeral, |item| item.id);
        debug!(count = merged.len(), "reconciled items from both backends");
        merged
    }

    /// Replace the stored item list
    pub fn save_all(&self, items: &[Item]) -> WriteReport {
        let conflict = match self.loaded_version.get() {
            Some(loaded) => self.storage.version(ITEMS_KEY) != loaded,
            None => false,
        };
        if conflict {
            warn!(key = ITEMS_KEY, "collection changed since it was loaded");
        }

        let mut report = self.storage.set(ITEMS_KEY, items);
        if report.is_persisted() {
            self.storage.bump_version(ITEMS_KEY);
            self.loaded_version.set(Some(self.storage.version(ITEMS_KEY)));
        }
        report.conflict = conflict;
        if !report.is_persisted() {
            warn!(key = ITEMS_KEY, "change was not stored in any backend");
        }
        self.last_report.set(Some(report));
        report
    }

    /// Outcome of the most recent save through this store
    ///
    /// Lets callers of `add`/`remove_by_id` tell whether the
    /// change actually reached a backend.
    pub fn last_report(&self) -> Option<WriteReport> {
        self.last_report.get()
    }

    /// Find an item by id
    pub fn find(items: &[Item], id: i64) -> Option<&Item> {
        items.iter().find(|i| i.id == id)
    }

    /// Add an item to the stored list
    ///
    /// The name is trimmed and must not be empty. If the id is already taken
    /// it is bumped to the next free value. Returns the item as stored.
    pub fn add(&self, mut item: Item) -> DomainResult<Item> {
        item.name = item.name.trim().to_string();
        if item.name.is_empty() {
            return Err(DomainError::empty("name"));
        }

        let mut items = self.load_all();
        while Self::find(&items, item.id).is_some() {
            item.id = item.id.checked_add(1).ok_or_else(|| DomainError::InvalidInput {
                field: "id",
                reason: "no free id left after this one".to_string(),
            })?;
        }

        items.push(item.clone());
        self.save_all(&items);

        info!(id = item.id, name = %item.name, category = %item.category, "added item");
        Ok(item)
    }

    /// Remove the item with `id` and store the remaining list
    pub fn remove_by_id(&self, id: i64) -> DomainResult<Item> {
        let items = self.load_all();
        let Some(removed) = Self::find(&items, id).cloned() else {
            return Err(DomainError::RecordNotFound(format!("Item {}", id)));
        };

        let remaining: Vec<Item> = items.into_iter().filter(|i| i.id != id).collect();
        self.save_all(&remaining);

        info!(id, remaining = remaining.len(), "removed item");
        Ok(removed)
    }

    /// Items in one category, in stored order
    pub fn list_by_category(items: &[Item], category: Category) -> Vec<Item> {
        items
            .iter()
            .filter(|i| i.category == category)
            .cloned()
            .collect()
    }

    // ==================== Selected Category ====================

    /// Remember the category the user is browsing, for this session only
    pub fn select_category(&self, category: Category) {
        self.storage.set_ephemeral(SELECTED_CATEGORY_KEY, &category);
    }

    pub fn selected_category(&self) -> Option<Category> {
        self.storage.get_ephemeral(SELECTED_CATEGORY_KEY)
    }

    pub fn clear_selected_category(&self) {
        self.storage.remove_ephemeral(SELECTED_CATEGORY_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Backend, DualStore, MemoryBackend, UnavailableBackend};
    use chrono::NaiveDate;

    fn storage() -> AppStorage {
        AppStorage::with_backends(
            Box::new(MemoryBackend::new(Backend::Durable)),
            Box::new(MemoryBackend::new(Backend::Ephemeral)),
        )
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn item(id: i64, name: &str, category: Category) -> Item {
        Item::with_id(id, name, category, date("2026-10-30"))
    }

    #[test]
    fn test_load_all_empty() {
        let storage = storage();
        assert!(ItemStore::new(&storage).load_all().is_empty());
    }

    #[test]
    fn test_add_and_load() {
        let storage = storage();
        let items = ItemStore::new(&storage);

        items.add(item(1, "Milk", Category::Dairy)).unwrap();
        items.add(item(2, "Kale", Category::Vegetables)).unwrap();

        assert_eq!(
            items.load_all(),
            vec![
                item(1, "Milk", Category::Dairy),
                item(2, "Kale", Category::Vegetables)
            ]
        );
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let storage = storage();
        let items = ItemStore::new(&storage);

        assert!(matches!(
            items.add(item(1, "  ", Category::Dairy)),
            Err(DomainError::InvalidInput { field: "name", .. })
        ));
        assert!(items.load_all().is_empty());
    }

    #[test]
    fn test_add_bumps_colliding_id() {
        let storage = storage();
        let items = ItemStore::new(&storage);

        items.add(item(10, "Milk", Category::Dairy)).unwrap();
        items.add(item(11, "Yogurt", Category::Dairy)).unwrap();
        let stored = items.add(item(10, "Cheese", Category::Dairy)).unwrap();

        assert_eq!(stored.id, 12);
        assert_eq!(items.load_all().len(), 3);
    }

    #[test]
    fn test_add_with_exhausted_id_space() {
        let storage = storage();
        let items = ItemStore::new(&storage);
        items.add(item(i64::MAX, "Milk", Category::Dairy)).unwrap();

        assert!(matches!(
            items.add(item(i64::MAX, "Cheese", Category::Dairy)),
            Err(DomainError::InvalidInput { field: "id", .. })
        ));
        assert_eq!(items.load_all().len(), 1);
    }

    #[test]
    fn test_remove_by_id_is_full_replace() {
        let storage = storage();
        let items = ItemStore::new(&storage);
        items.save_all(&[item(5, "Old", Category::Meats), item(6, "New", Category::Meats)]);

        let removed = items.remove_by_id(5).unwrap();
        assert_eq!(removed.id, 5);

        let stored: Vec<Item> = storage.get(ITEMS_KEY).unwrap();
        assert_eq!(stored, vec![item(6, "New", Category::Meats)]);

        let snapshots = storage.read_both::<Vec<Item>>(ITEMS_KEY);
        assert_eq!(snapshots.durable, snapshots.ephemeral);
    }

    #[test]
    fn test_remove_missing_id() {
        let storage = storage();
        let items = ItemStore::new(&storage);
        items.add(item(1, "Milk", Category::Dairy)).unwrap();

        assert!(matches!(
            items.remove_by_id(99),
            Err(DomainError::RecordNotFound(_))
        ));
        assert_eq!(items.load_all().len(), 1);
    }

    #[test]
    fn test_list_by_category() {
        let all = vec![
            item(1, "Milk", Category::Dairy),
            item(2, "Kale", Category::Vegetables),
            item(3, "Butter", Category::Dairy),
        ];

        let dairy = ItemStore::list_by_category(&all, Category::Dairy);
        let names: Vec<&str> = dairy.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Butter"]);

        assert!(ItemStore::list_by_category(&all, Category::Seafood).is_empty());
    }

    #[test]
    fn test_load_merged_prefers_logical_read() {
        let storage = storage();
        let items = ItemStore::new(&storage);
        items.add(item(1, "Milk", Category::Dairy)).unwrap();

        assert_eq!(items.load_merged(), vec![item(1, "Milk", Category::Dairy)]);
    }

    #[test]
    fn test_load_merged_reconciles_divergent_copies() {
        let dual = DualStore::new(
            Box::new(MemoryBackend::new(Backend::Durable)),
            Box::new(MemoryBackend::new(Backend::Ephemeral)),
        );
        // Durable holds an empty list, ephemeral holds the items
        dual.write(Backend::Durable, ITEMS_KEY, "[]").unwrap();
        let ephemeral = serde_json::to_string(&vec![
            item(1, "Milk", Category::Dairy),
            item(2, "Kale", Category::Vegetables),
        ])
        .unwrap();
        dual.write(Backend::Ephemeral, ITEMS_KEY, &ephemeral).unwrap();

        let storage = AppStorage::new(dual);
        let items = ItemStore::new(&storage);

        assert!(items.load_all().is_empty());
        assert_eq!(items.load_merged().len(), 2);
    }

    #[test]
    fn test_load_merged_with_corrupted_durable_copy() {
        let dual = DualStore::new(
            Box::new(MemoryBackend::new(Backend::Durable)),
            Box::new(MemoryBackend::new(Backend::Ephemeral)),
        );
        dual.write(Backend::Durable, ITEMS_KEY, "not json").unwrap();
        let ephemeral = serde_json::to_string(&vec![item(3, "Fish", Category::Seafood)]).unwrap();
        dual.write(Backend::Ephemeral, ITEMS_KEY, &ephemeral).unwrap();

        let storage = AppStorage::new(dual);
        let items = ItemStore::new(&storage);

        assert_eq!(items.load_merged(), vec![item(3, "Fish", Category::Seafood)]);
    }

    #[test]
    fn test_durable_unavailable_still_works_in_session() {
        let storage = AppStorage::with_backends(
            Box::new(UnavailableBackend::new(Backend::Durable, "blocked")),
            Box::new(MemoryBackend::new(Backend::Ephemeral)),
        );
        let items = ItemStore::new(&storage);

        items.add(item(1, "Milk", Category::Dairy)).unwrap();
        let report = items.save_all(&items.load_all());
        assert!(!report.durable);
        assert!(report.ephemeral);

        assert_eq!(items.load_all().len(), 1);
    }

    #[test]
    fn test_selected_category_is_ephemeral_only() {
        let storage = storage();
        let items = ItemStore::new(&storage);

        assert_eq!(items.selected_category(), None);
        items.select_category(Category::Bakery);
        assert_eq!(items.selected_category(), Some(Category::Bakery));

        let snapshots = storage.read_both::<Category>(SELECTED_CATEGORY_KEY);
        assert_eq!(snapshots.durable, None);
        assert_eq!(snapshots.ephemeral, Some(Category::Bakery));

        items.clear_selected_category();
        assert_eq!(items.selected_category(), None);
    }

    #[test]
    fn test_last_report_tracks_each_save() {
        let storage = AppStorage::with_backends(
            Box::new(UnavailableBackend::new(Backend::Durable, "blocked")),
            Box::new(MemoryBackend::new(Backend::Ephemeral)),
        );
        let items = ItemStore::new(&storage);

        items.add(item(1, "Milk", Category::Dairy)).unwrap();
        let report = items.last_report().unwrap();
        assert!(report.is_persisted());
        assert!(report.is_partial());

        let blocked = AppStorage::with_backends(
            Box::new(UnavailableBackend::new(Backend::Durable, "blocked")),
            Box::new(UnavailableBackend::new(Backend::Ephemeral, "blocked")),
        );
        let items = ItemStore::new(&blocked);
        items.add(item(2, "Kale", Category::Vegetables)).unwrap();
        assert!(!items.last_report().unwrap().is_persisted());
    }
}
