//! Item command handlers

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use freshshelf_core::{Category, Item, ItemStore, Store};

use crate::commands::user::warn_if_unsaved;
use crate::output::{ItemView, Output};

/// Add an item to the shelf
pub fn add(store: &Store, name: &str, category: &str, expires: &str, output: &Output) -> Result<()> {
    let category: Category = category.parse()?;
    let expiry_date = parse_date(expires)?;

    let items = store.items();
    let item = items
        .add(Item::new(name, category, expiry_date))
        .context("Failed to add item")?;
    warn_if_unsaved(items.last_report(), output);

    output.success(&format!("Added {} ({})", item.name, item.id));
    output.print_item(&ItemView::new(
        &item,
        Store::today(),
        store.config().expiring_soon_days,
    ));
    Ok(())
}

/// List items, optionally limited to one category
pub fn list(store: &Store, category: Option<&str>, output: &Output) -> Result<()> {
    let mut items = store.items().load_merged();
    if let Some(category) = category {
        items = ItemStore::list_by_category(&items, category.parse()?);
    }

    output.print_items(&items, Store::today(), store.config().expiring_soon_days);
    Ok(())
}

/// Delete an item by id
pub fn delete(store: &Store, id: i64, output: &Output) -> Result<()> {
    let items = store.items();
    let removed = items.remove_by_id(id)?;
    warn_if_unsaved(items.last_report(), output);
    output.success(&format!("Deleted {} ({})", removed.name, removed.id));
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => bail!("Invalid expiry date '{}'. Use YYYY-MM-DD.", s),
    }
}
