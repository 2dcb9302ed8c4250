//! Status and maintenance command handlers

use anyhow::Result;
use serde_json::json;

use freshshelf_core::Store;

use crate::output::{Output, OutputFormat};
use crate::prompt::confirm;

/// Show backend availability and what is stored
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let status = store.status();
    let users = store.users().load_all();
    let items = store.items().load_merged();
    let current = store.users().current_user();

    match output.format {
        OutputFormat::Json => {
            output.print_json(&json!({
                "backends": status,
                "logged_in": current.map(|u| u.username),
                "counts": {
                    "users": users.len(),
                    "items": items.len()
                }
            }));
        }
        OutputFormat::Quiet => {
            println!("{}", items.len());
        }
        OutputFormat::Human => {
            println!("FreshShelf Status");
            println!("=================");
            println!();
            println!("Storage:");
            println!(
                "  Durable:   {} ({})",
                availability(status.durable_available),
                status.durable_location
            );
            println!(
                "  Session:   {} ({})",
                availability(status.ephemeral_available),
                status.ephemeral_location
            );
            if !status.durable_available && !status.ephemeral_available {
                output.warn("No storage available. Changes will not be kept.");
            }
            println!();
            println!("Account:");
            println!(
                "  Logged in: {}",
                current
                    .as_ref()
                    .map(|u| u.username.as_str())
                    .unwrap_or("(nobody)")
            );
            println!();
            println!("Contents:");
            println!("  Users: {}", users.len());
            println!("  Items: {}", items.len());
        }
    }

    Ok(())
}

/// Remove all stored data from both backends
pub fn clear(store: &Store, yes: bool, output: &Output) -> Result<()> {
    if !yes && output.should_prompt() {
        println!("This removes every user and item from both storage backends.");
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.clear_all();
    output.success("Cleared all stored data");
    Ok(())
}

fn availability(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "unavailable"
    }
}
