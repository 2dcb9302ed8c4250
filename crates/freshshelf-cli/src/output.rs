//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::NaiveDate;
use serde_json::{json, Value};

use freshshelf_core::models::group_by_category;
use freshshelf_core::{Category, ExpiryStatus, Item, RecipeMatch, User};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// An item as shown to the user, with its status as of one day
pub struct ItemView<'a> {
    pub item: &'a Item,
    pub days_left: i64,
    pub status: ExpiryStatus,
}

impl<'a> ItemView<'a> {
    pub fn new(item: &'a Item, today: NaiveDate, expiring_soon_days: i64) -> Self {
        Self {
            item,
            days_left: item.days_left(today),
            status: item.status(today, expiring_soon_days),
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.item.id,
            "name": self.item.name,
            "category": self.item.category,
            "expiry": self.item.expiry_date,
            "days_left": self.days_left,
            "status": self.status,
        })
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single item
    pub fn print_item(&self, view: &ItemView) {
        match self.format {
            OutputFormat::Human => {
                let item = view.item;
                println!("ID:       {}", item.id);
                println!("Name:     {}", item.name);
                println!("Category: {} {}", item.category.icon(), item.category);
                println!("Expires:  {}", item.expiry_date);
                println!(
                    "Status:   {} ({})",
                    view.status,
                    describe_days(view.days_left)
                );
            }
            OutputFormat::Json => {
                println!("{:#}", view.to_json());
            }
            OutputFormat::Quiet => {
                println!("{}", view.item.id);
            }
        }
    }

    /// Print a list of items
    ///
    /// Human output groups items under their category, in category order.
    pub fn print_items(&self, items: &[Item], today: NaiveDate, expiring_soon_days: i64) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No items found.");
                    return;
                }
                for line in grouped_item_lines(items, today, expiring_soon_days) {
                    println!("{}", line);
                }
                println!("{} item(s)", items.len());
            }
            OutputFormat::Json => {
                let items: Vec<Value> = items
                    .iter()
                    .map(|i| ItemView::new(i, today, expiring_soon_days).to_json())
                    .collect();
                println!("{:#}", Value::Array(items));
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print categories with item counts, marking the selected one
    pub fn print_categories(&self, counts: &[(Category, usize)], selected: Option<Category>) {
        match self.format {
            OutputFormat::Human => {
                for (category, count) in counts {
                    let marker = if Some(*category) == selected { "*" } else { " " };
                    println!(
                        "{} {} {:<20} ({})",
                        marker,
                        category.icon(),
                        category.name(),
                        count
                    );
                }
            }
            OutputFormat::Json => {
                let categories: Vec<Value> = counts
                    .iter()
                    .map(|(category, count)| {
                        json!({
                            "name": category.name(),
                            "icon": category.icon(),
                            "count": count,
                            "selected": Some(*category) == selected,
                        })
                    })
                    .collect();
                println!("{:#}", Value::Array(categories));
            }
            OutputFormat::Quiet => {
                for (category, _) in counts {
                    println!("{}", category.name());
                }
            }
        }
    }

    /// Print recipe suggestions, best match first
    pub fn print_recipes(&self, matches: &[RecipeMatch]) {
        match self.format {
            OutputFormat::Human => {
                if matches.is_empty() {
                    println!("No recipes match your shelf. Add some items first.");
                    return;
                }
                for m in matches {
                    let recipe = m.recipe;
                    println!(
                        "{} ({:.0}% match) - {}, {}, {}",
                        recipe.name,
                        m.match_percentage,
                        recipe.category,
                        recipe.difficulty,
                        recipe.time
                    );
                    println!("  You have: {}", m.matched_ingredients.join(", "));
                    for line in recipe.instructions.lines() {
                        println!("  {}", line);
                    }
                    println!();
                }
                println!("{} recipe(s)", matches.len());
            }
            OutputFormat::Json => {
                let recipes: Vec<Value> = matches
                    .iter()
                    .map(|m| {
                        json!({
                            "name": m.recipe.name,
                            "category": m.recipe.category,
                            "ingredients": m.recipe.ingredients,
                            "instructions": m.recipe.instructions,
                            "difficulty": m.recipe.difficulty,
                            "time": m.recipe.time,
                            "match_percentage": m.match_percentage,
                            "matched_ingredients": m.matched_ingredients,
                        })
                    })
                    .collect();
                println!("{:#}", Value::Array(recipes));
            }
            OutputFormat::Quiet => {
                for m in matches {
                    println!("{}", m.recipe.name);
                }
            }
        }
    }

    /// Print the logged-in user, or a note that nobody is
    pub fn print_user(&self, user: Option<&User>) {
        match self.format {
            OutputFormat::Human => match user {
                Some(user) => println!("Logged in as {}", user.username),
                None => println!("Not logged in."),
            },
            OutputFormat::Json => {
                println!("{}", json!({ "username": user.map(|u| &u.username) }));
            }
            OutputFormat::Quiet => {
                if let Some(user) = user {
                    println!("{}", user.username);
                }
            }
        }
    }

    /// Print a JSON value as-is, for commands with their own layout
    pub fn print_json(&self, value: &Value) {
        println!("{:#}", value);
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warn(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// Category headers followed by their items, a blank line after each group
fn grouped_item_lines(items: &[Item], today: NaiveDate, expiring_soon_days: i64) -> Vec<String> {
    let mut lines = Vec::new();
    for (category, group) in group_by_category(items) {
        lines.push(format!(
            "{} {} ({})",
            category.icon(),
            category.name(),
            group.len()
        ));
        for item in group {
            let view = ItemView::new(item, today, expiring_soon_days);
            lines.push(format!(
                "  {} | {:<24} | {} | {:<13} | {}",
                item.id,
                truncate(&item.name, 24),
                item.expiry_date,
                view.status.label(),
                describe_days(view.days_left)
            ));
        }
        lines.push(String::new());
    }
    lines
}

/// Human wording for the days left until expiry
fn describe_days(days_left: i64) -> String {
    match days_left {
        d if d < 0 => format!("expired {} day(s) ago", -d),
        0 => "expires today".to_string(),
        1 => "1 day left".to_string(),
        d => format!("{} days left", d),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
