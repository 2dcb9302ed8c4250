//! Category command handlers

use anyhow::Result;

use freshshelf_core::{Category, ItemStore, Store};

use crate::output::Output;

/// List every category with the number of items in it
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let items = store.items().load_merged();
    let counts: Vec<(Category, usize)> = Category::ALL
        .into_iter()
        .map(|c| (c, ItemStore::list_by_category(&items, c).len()))
        .collect();

    output.print_categories(&counts, store.items().selected_category());
    Ok(())
}

/// Remember a category for the rest of the session
pub fn select(store: &Store, category: &str, output: &Output) -> Result<()> {
    let category: Category = category.parse()?;
    store.items().select_category(category);
    output.success(&format!("Selected {} {}", category.icon(), category));
    Ok(())
}

pub fn clear(store: &Store, output: &Output) -> Result<()> {
    store.items().clear_selected_category();
    output.success("Cleared selected category");
    Ok(())
}
