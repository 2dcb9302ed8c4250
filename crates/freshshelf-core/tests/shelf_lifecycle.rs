//! End-to-end behavior of the store across sessions and backend failures

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use freshshelf_core::items::ITEMS_KEY;
use freshshelf_core::storage::{
    FileBackend, KeyValueBackend, MemoryBackend, StorageError, StorageResult, UnavailableBackend,
};
use freshshelf_core::{
    merge, AppStorage, Backend, Category, Config, DomainError, Item, ItemStore, Store, UserStore,
};
use serde_json::json;
use tempfile::TempDir;

/// Backend whose writes can be switched off, simulating a quota that fills up
struct Switchable {
    inner: MemoryBackend,
    writable: Arc<AtomicBool>,
}

impl KeyValueBackend for Switchable {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if !self.writable.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(Backend::Durable, "quota exceeded"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key)
    }

    fn describe(&self) -> String {
        "switchable".to_string()
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn config(temp_dir: &TempDir, session: &str) -> Config {
    Config {
        data_dir: temp_dir.path().join("data"),
        session_dir: Some(temp_dir.path().join(session)),
        session_in_memory: false,
        durable_enabled: true,
        expiring_soon_days: 7,
        log_file: None,
    }
}

#[test]
fn roundtrip_structured_values() {
    let storage = AppStorage::with_backends(
        Box::new(MemoryBackend::new(Backend::Durable)),
        Box::new(MemoryBackend::new(Backend::Ephemeral)),
    );

    for value in [
        json!(null),
        json!([]),
        json!({"username": "bob", "password": "secret"}),
        json!([{"id": 1, "name": "Crème fraîche", "tags": ["a", "b"]}]),
    ] {
        assert!(storage.set("value", &value).is_persisted());
        assert_eq!(storage.get_value("value"), Some(value));
    }
}

#[test]
fn both_backends_failing_is_silent() {
    let storage = AppStorage::with_backends(
        Box::new(UnavailableBackend::new(Backend::Durable, "blocked")),
        Box::new(UnavailableBackend::new(Backend::Ephemeral, "blocked")),
    );

    let report = storage.set("items", &json!([{"id": 1}]));
    assert!(!report.is_persisted());
    assert_eq!(storage.get_value("items"), None);
    storage.remove("items");
}

#[test]
fn merge_example() {
    let merged = merge(
        vec![json!({"id": 1, "v": "a"}), json!({"id": 2, "v": "b"})],
        vec![json!({"id": 2, "v": "c"}), json!({"id": 3, "v": "d"})],
        |r| r["id"].as_i64(),
    );

    assert_eq!(
        merged,
        vec![
            json!({"id": 1, "v": "a"}),
            json!({"id": 2, "v": "c"}),
            json!({"id": 3, "v": "d"})
        ]
    );
}

#[test]
fn registration_and_login_flow() {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open_with_config(config(&temp_dir, "session"));
    let users = store.users();

    users.register("alice", "secret").unwrap();
    assert_eq!(
        users.register("Alice", "secret"),
        Err(DomainError::DuplicateUsername("Alice".to_string()))
    );
    assert!(matches!(
        users.register("ab", "secret"),
        Err(DomainError::InvalidInput { .. })
    ));

    let user = users.login("ALICE", "secret").unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(users.current_user().map(|u| u.username), Some("alice".into()));
}

#[test]
fn partial_write_is_recovered_by_reconciliation() {
    let writable = Arc::new(AtomicBool::new(true));
    let storage = AppStorage::with_backends(
        Box::new(Switchable {
            inner: MemoryBackend::new(Backend::Durable),
            writable: Arc::clone(&writable),
        }),
        Box::new(MemoryBackend::new(Backend::Ephemeral)),
    );
    let items = ItemStore::new(&storage);

    // Durable accepts an empty list, then starts refusing writes
    items.save_all(&[]);
    writable.store(false, Ordering::SeqCst);

    let report = items.save_all(&[
        Item::with_id(1, "Milk", Category::Dairy, date("2026-10-25")),
        Item::with_id(2, "Kale", Category::Vegetables, date("2026-10-21")),
    ]);
    assert!(report.is_partial());
    assert!(!report.durable);

    // The durable copy shadows the newer ephemeral one on a plain read...
    assert!(items.load_all().is_empty());

    // ...but the merged read finds both items
    let merged = items.load_merged();
    let ids: Vec<i64> = merged.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn restart_keeps_durable_data_but_not_session_data() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = Store::open_with_config(config(&temp_dir, "session-1"));
        store.users().register("bob", "secret").unwrap();
        store
            .items()
            .add(Item::with_id(5, "Salmon", Category::Seafood, date("2026-10-22")))
            .unwrap();
        store.items().select_category(Category::Seafood);
    }

    let store = Store::open_with_config(config(&temp_dir, "session-2"));
    assert!(store.users().authenticate("bob", "secret").is_ok());
    assert_eq!(store.items().load_all().len(), 1);
    assert_eq!(store.items().selected_category(), None);
}

#[test]
fn remove_by_id_rewrites_whole_collection_in_both_backends() {
    let temp_dir = TempDir::new().unwrap();
    let durable_dir = temp_dir.path().join("durable");
    let session_dir = temp_dir.path().join("session");
    let storage = AppStorage::with_backends(
        Box::new(FileBackend::new(&durable_dir)),
        Box::new(FileBackend::new(&session_dir)),
    );
    let items = ItemStore::new(&storage);
    items.save_all(&[
        Item::with_id(5, "Eggs", Category::Dairy, date("2026-10-25")),
        Item::with_id(6, "Bread", Category::Bakery, date("2026-10-23")),
    ]);

    items.remove_by_id(5).unwrap();

    for dir in [&durable_dir, &session_dir] {
        let raw = std::fs::read_to_string(dir.join(format!("{}.json", ITEMS_KEY))).unwrap();
        let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            stored,
            json!([{"id": 6, "name": "Bread", "category": "Bakery", "expiry": "2026-10-23"}])
        );
    }
}

#[test]
fn interleaved_sessions_lose_updates_but_flag_them() {
    let storage = AppStorage::with_backends(
        Box::new(MemoryBackend::new(Backend::Durable)),
        Box::new(MemoryBackend::new(Backend::Ephemeral)),
    );
    let tab_a = UserStore::new(&storage);
    let tab_b = UserStore::new(&storage);

    let mut users_a = tab_a.load_all();
    tab_b.register("zoe", "secret").unwrap();

    users_a.push(freshshelf_core::User::new("yuri", "secret"));
    let report = tab_a.save_all(&users_a);

    assert!(report.is_persisted());
    assert!(report.conflict);
    assert!(tab_a.authenticate("zoe", "secret").is_err());
}

#[test]
fn single_writer_is_not_flagged_after_durable_stops_accepting() {
    let writable = Arc::new(AtomicBool::new(true));
    let storage = AppStorage::with_backends(
        Box::new(Switchable {
            inner: MemoryBackend::new(Backend::Durable),
            writable: Arc::clone(&writable),
        }),
        Box::new(MemoryBackend::new(Backend::Ephemeral)),
    );
    let items = ItemStore::new(&storage);
    items.save_all(&[]);
    writable.store(false, Ordering::SeqCst);

    items.load_all();
    let milk = Item::with_id(1, "Milk", Category::Dairy, date("2026-10-25"));
    let kale = Item::with_id(2, "Kale", Category::Vegetables, date("2026-10-21"));

    let first = items.save_all(&[milk.clone()]);
    let second = items.save_all(&[milk.clone(), kale.clone()]);
    let third = items.save_all(&[kale]);

    assert!(!first.conflict);
    assert!(!second.conflict);
    assert!(!third.conflict);
    assert_eq!(storage.version(ITEMS_KEY), 4);
}
