//! Recipe command handler

use anyhow::Result;

use freshshelf_core::Store;

use crate::output::Output;

/// Suggest recipes from the shelf
///
/// Uses the selected category's items unless `all` is set.
pub fn suggest(store: &Store, all: bool, output: &Output) -> Result<()> {
    let matches = store.suggest_recipes(!all);
    output.print_recipes(&matches);
    Ok(())
}
