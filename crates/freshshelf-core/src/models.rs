//! Data models for FreshShelf
//!
//! Defines the persisted records (`User`, `Item`) and the fixed set of
//! item categories. Field names match the stored JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Default number of days before expiry at which an item counts as expiring soon
pub const DEFAULT_EXPIRING_SOON_DAYS: i64 = 7;

/// A registered user
///
/// Passwords are stored and compared as plain text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Case-insensitive username comparison
    pub fn has_username(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.to_lowercase()
    }
}

/// Fixed item categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Dairy,
    Vegetables,
    Fruits,
    Meats,
    Seafood,
    Bakery,
    #[serde(rename = "Grains & Pulses")]
    GrainsAndPulses,
    #[serde(rename = "Spices & Condiments")]
    SpicesAndCondiments,
    Beverages,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Dairy,
        Category::Vegetables,
        Category::Fruits,
        Category::Meats,
        Category::Seafood,
        Category::Bakery,
        Category::GrainsAndPulses,
        Category::SpicesAndCondiments,
        Category::Beverages,
    ];

    /// Display name, also the stored form
    pub fn name(&self) -> &'static str {
        match self {
            Category::Dairy => "Dairy",
            Category::Vegetables => "Vegetables",
            Category::Fruits => "Fruits",
            Category::Meats => "Meats",
            Category::Seafood => "Seafood",
            Category::Bakery => "Bakery",
            Category::GrainsAndPulses => "Grains & Pulses",
            Category::SpicesAndCondiments => "Spices & Condiments",
            Category::Beverages => "Beverages",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Dairy => "🥛",
            Category::Vegetables => "🥬",
            Category::Fruits => "🍎",
            Category::Meats => "🥩",
            Category::Seafood => "🐟",
            Category::Bakery => "🍞",
            Category::GrainsAndPulses => "🌾",
            Category::SpicesAndCondiments => "🌶️",
            Category::Beverages => "☕",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    /// Accepts the display name case-insensitively, or a slug like `grains-pulses`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Category::ALL
            .into_iter()
            .find(|c| normalize(c.name()) == wanted)
            .ok_or_else(|| DomainError::InvalidInput {
                field: "category",
                reason: format!("unknown category '{}'", s.trim()),
            })
    }
}

/// Lowercase and drop separators, so "Grains & Pulses" == "grains-pulses"
///
/// Only whitespace, `&`, `-` and `_` are dropped; any other character has to
/// match the category name.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '&' | '-' | '_')))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A perishable item on the shelf
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Creation timestamp in milliseconds, unique within the collection
    pub id: i64,
    pub name: String,
    pub category: Category,
    #[serde(rename = "expiry", alias = "expiryDate")]
    pub expiry_date: NaiveDate,
}

impl Item {
    /// Create an item with an id derived from the current time
    pub fn new(name: impl Into<String>, category: Category, expiry_date: NaiveDate) -> Self {
        Self::with_id(Utc::now().timestamp_millis(), name, category, expiry_date)
    }

    pub fn with_id(
        id: i64,
        name: impl Into<String>,
        category: Category,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            expiry_date,
        }
    }

    /// Whole days from `today` until expiry; zero or negative once expired
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.expiry_date - today).num_days()
    }

    pub fn status(&self, today: NaiveDate, expiring_soon_days: i64) -> ExpiryStatus {
        ExpiryStatus::from_days_left(self.days_left(today), expiring_soon_days)
    }
}

/// How close an item is to its expiry date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    Safe,
}

impl ExpiryStatus {
    pub fn from_days_left(days_left: i64, expiring_soon_days: i64) -> Self {
        if days_left <= 0 {
            ExpiryStatus::Expired
        } else if days_left <= expiring_soon_days {
            ExpiryStatus::ExpiringSoon
        } else {
            ExpiryStatus::Safe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "Expired",
            ExpiryStatus::ExpiringSoon => "Expiring Soon",
            ExpiryStatus::Safe => "Safe",
        }
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Group items by category, in category display order, skipping empty ones
pub fn group_by_category(items: &[Item]) -> Vec<(Category, Vec<&Item>)> {
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let in_category: Vec<&Item> =
                items.iter().filter(|i| i.category == category).collect();
            (!in_category.is_empty()).then_some((category, in_category))
        })
        .collect()
}
