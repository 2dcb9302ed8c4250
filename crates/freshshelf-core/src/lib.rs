//! FreshShelf Core Library
//!
//! This crate provides the core functionality for FreshShelf, a household
//! inventory tracker for perishable items.
//!
//! # Architecture
//!
//! - **Durable backend**: survives restarts (files under the data directory)
//! - **Ephemeral backend**: lives for the current session only
//!
//! Every write goes to both backends; reads prefer the durable one. Either
//! backend may be unavailable at any time, and the store keeps working with
//! whatever is left.
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::open()?;
//!
//! store.users().register("alice", "secret")?;
//! store.users().login("alice", "secret")?;
//!
//! store.items().add(Item::new("Milk", Category::Dairy, expiry))?;
//! let items = store.items().load_all();
//! ```
//!
//! # Modules
//!
//! - `store`: Unified storage interface (main entry point)
//! - `storage`: Backends, `DualStore` and `AppStorage`
//! - `reconcile`: Merging divergent copies of a collection
//! - `users` / `items`: Typed collection stores
//! - `models`: Users, items, categories and expiry status
//! - `recipes`: Recipe suggestions from the current shelf
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod items;
pub mod models;
pub mod recipes;
pub mod reconcile;
pub mod storage;
pub mod store;
pub mod users;

pub use config::Config;
pub use error::{DomainError, DomainResult};
pub use items::ItemStore;
pub use models::{Category, ExpiryStatus, Item, User};
pub use recipes::{Recipe, RecipeMatch};
pub use reconcile::merge;
pub use storage::{AppStorage, Backend, BackendStatus, StorageError, WriteReport};
pub use store::Store;
pub use users::UserStore;
