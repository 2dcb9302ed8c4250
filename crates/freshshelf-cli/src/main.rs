//! FreshShelf CLI
//!
//! Command-line interface for FreshShelf - track perishables before they expire.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use freshshelf_core::{Config, Store};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "freshshelf")]
#[command(about = "FreshShelf - household inventory of perishable items")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternative config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        username: String,
        password: String,
    },
    /// Log in for this session
    Login {
        username: String,
        password: String,
    },
    /// Log out of this session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage shelf items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// List categories or choose one to browse
    Category {
        #[command(subcommand)]
        command: Option<CategoryCommands>,
    },
    /// Suggest recipes from what is on the shelf
    Recipes {
        /// Use every item, ignoring the selected category
        #[arg(long)]
        all: bool,
    },
    /// Show backend availability and counts
    Status,
    /// Remove all stored users and items
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Add an item to the shelf
    #[command(alias = "create")]
    Add {
        /// Item name
        name: String,
        /// Category, e.g. dairy or "grains & pulses"
        #[arg(short, long)]
        category: String,
        /// Expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expires: String,
    },
    /// List items on the shelf
    #[command(alias = "ls")]
    List {
        /// Only show one category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete an item
    #[command(alias = "rm")]
    Delete {
        /// Item ID
        id: i64,
    },
}

#[derive(Subcommand, Clone)]
enum CategoryCommands {
    /// List categories with item counts
    List,
    /// Remember a category for this session
    Select { category: String },
    /// Forget the selected category
    Clear,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, session_dir, session_in_memory,
        /// durable_enabled, expiring_soon_days, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work on the file directly and don't need the store
    let command = match cli.command {
        Commands::Config { command } => {
            return handle_config_command(command, config_path, &output);
        }
        command => command,
    };

    let config = Config::load_with_cli_override(config_path)?;
    init_logging(&config);
    let store = Store::open_with_config(config);

    match command {
        Commands::Register { username, password } => {
            commands::user::register(&store, &username, &password, &output)
        }
        Commands::Login { username, password } => {
            commands::user::login(&store, &username, &password, &output)
        }
        Commands::Logout => commands::user::logout(&store, &output),
        Commands::Whoami => commands::user::whoami(&store, &output),
        Commands::Item { command } => handle_item_command(command, &store, &output),
        Commands::Category { command } => handle_category_command(command, &store, &output),
        Commands::Recipes { all } => {
            commands::user::require_user(&store)?;
            commands::recipe::suggest(&store, all, &output)
        }
        Commands::Status => commands::status::show(&store, &output),
        Commands::Clear { yes } => commands::status::clear(&store, yes, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_item_command(command: ItemCommands, store: &Store, output: &Output) -> Result<()> {
    commands::user::require_user(store)?;

    match command {
        ItemCommands::Add {
            name,
            category,
            expires,
        } => commands::item::add(store, &name, &category, &expires, output),
        ItemCommands::List { category } => commands::item::list(store, category.as_deref(), output),
        ItemCommands::Delete { id } => commands::item::delete(store, id, output),
    }
}

fn handle_category_command(
    command: Option<CategoryCommands>,
    store: &Store,
    output: &Output,
) -> Result<()> {
    commands::user::require_user(store)?;

    match command {
        Some(CategoryCommands::List) | None => commands::category::list(store, output),
        Some(CategoryCommands::Select { category }) => {
            commands::category::select(store, &category, output)
        }
        Some(CategoryCommands::Clear) => commands::category::clear(store, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if FRESHSHELF_LOG is set (e.g. `FRESHSHELF_LOG=debug`).
/// Logs go to `config.log_file` when set, otherwise to stderr.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("FRESHSHELF_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "freshshelf_core={},freshshelf_cli={}",
        log_level, log_level
    ));

    match &config.log_file {
        Some(log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };

            // Ignore the error if a subscriber is already installed
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();

            info!("logging initialized to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
