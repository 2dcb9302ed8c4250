//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/freshshelf/config.toml)
//! 3. Environment variables (FRESHSHELF_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::DEFAULT_EXPIRING_SOON_DAYS;

/// Environment variable prefix
const ENV_PREFIX: &str = "FRESHSHELF";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for durable storage
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory for session storage (defaults to a temp directory)
    #[serde(default)]
    pub session_dir: Option<PathBuf>,

    /// Keep session storage in memory, for this process only
    #[serde(default)]
    pub session_in_memory: bool,

    /// Whether the durable backend may be used
    #[serde(default = "default_true")]
    pub durable_enabled: bool,

    /// Days before expiry at which an item is "expiring soon"
    #[serde(default = "default_expiring_soon_days")]
    pub expiring_soon_days: i64,

    /// Log file path (stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            session_dir: None,
            session_in_memory: false,
            durable_enabled: true,
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (FRESHSHELF_DATA_DIR, FRESHSHELF_SESSION_DIR, ...)
    /// 2. Config file (~/.config/freshshelf/config.toml or FRESHSHELF_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring an explicit path from the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // Empty string means in-memory session storage
        if let Ok(val) = std::env::var(format!("{}_SESSION_DIR", ENV_PREFIX)) {
            if val.is_empty() {
                self.session_in_memory = true;
            } else {
                self.session_dir = Some(PathBuf::from(val));
                self.session_in_memory = false;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_DURABLE", ENV_PREFIX)) {
            self.durable_enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        if let Ok(val) = std::env::var(format!("{}_EXPIRING_SOON_DAYS", ENV_PREFIX)) {
            match val.parse() {
                Ok(days) => self.expiring_soon_days = days,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid expiring-soon days"),
            }
        }
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with FRESHSHELF_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("freshshelf")
            .join("config.toml")
    }

    /// Directory holding durable values
    pub fn durable_store_path(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    /// Directory holding session values, `None` for in-memory sessions
    pub fn session_store_path(&self) -> Option<PathBuf> {
        if self.session_in_memory {
            return None;
        }
        Some(
            self.session_dir
                .clone()
                .unwrap_or_else(default_session_dir),
        )
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("freshshelf")
}

/// Session storage lives in the temp directory, which does not survive a reboot
fn default_session_dir() -> PathBuf {
    std::env::temp_dir().join("freshshelf-session")
}

fn default_true() -> bool {
    true
}

fn default_expiring_soon_days() -> i64 {
    DEFAULT_EXPIRING_SOON_DAYS
}
