//! Config command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use freshshelf_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            output.print_json(&serde_json::json!({
                "data_dir": config.data_dir,
                "session_dir": config.session_store_path(),
                "session_in_memory": config.session_in_memory,
                "durable_enabled": config.durable_enabled,
                "expiring_soon_days": config.expiring_soon_days,
                "log_file": config.log_file
            }));
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:           {}", config.data_dir.display());
            println!(
                "  session_dir:        {}",
                config
                    .session_store_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(in memory)".to_string())
            );
            println!("  durable_enabled:    {}", config.durable_enabled);
            println!("  expiring_soon_days: {}", config.expiring_soon_days);
            println!("  log_file:           {}", display_optional(config.log_file.as_deref()));
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "session_dir" => {
            config.session_dir = optional_path(value);
        }
        "session_in_memory" => {
            config.session_in_memory = value
                .parse()
                .context("Invalid value for session_in_memory. Use 'true' or 'false'.")?;
        }
        "durable_enabled" => {
            config.durable_enabled = value
                .parse()
                .context("Invalid value for durable_enabled. Use 'true' or 'false'.")?;
        }
        "expiring_soon_days" => {
            let days: i64 = value
                .parse()
                .context("Invalid value for expiring_soon_days. Use a whole number of days.")?;
            if days < 0 {
                bail!("expiring_soon_days must not be negative");
            }
            config.expiring_soon_days = days;
        }
        "log_file" => {
            config.log_file = optional_path(value);
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, session_dir, session_in_memory, durable_enabled, \
                 expiring_soon_days, log_file",
                key
            );
        }
    }

    Ok(())
}

/// Empty or "none" clears an optional path
fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.into())
    }
}

fn display_optional(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}
