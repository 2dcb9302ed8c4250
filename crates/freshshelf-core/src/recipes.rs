//! Recipe suggestions
//!
//! A small built-in recipe list, ranked by how many of each recipe's
//! ingredient categories are present on the shelf.

use serde::Serialize;

use crate::models::Item;

/// A built-in recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub name: &'static str,
    pub category: &'static str,
    /// Lowercase ingredient category fragments, e.g. "grains" or "spices"
    pub ingredients: &'static [&'static str],
    pub instructions: &'static str,
    pub difficulty: &'static str,
    pub time: &'static str,
}

/// A recipe together with how well the current items cover it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeMatch {
    pub recipe: &'static Recipe,
    pub match_percentage: f64,
    pub matched_ingredients: Vec<&'static str>,
}

pub static RECIPES: &[Recipe] = &[
    Recipe {
        name: "Fresh Salad",
        category: "Salads",
        ingredients: &["vegetables", "fruits"],
        instructions: "1. Wash and chop fresh vegetables\n2. Add fruits for sweetness\n3. Toss together\n4. Drizzle with your favorite dressing",
        difficulty: "Easy",
        time: "10 mins",
    },
    Recipe {
        name: "Vegetable Stir-Fry",
        category: "Main Course",
        ingredients: &["vegetables", "meats"],
        instructions: "1. Heat oil in a pan\n2. Add vegetables and stir-fry\n3. Add meat for protein\n4. Season and serve hot",
        difficulty: "Medium",
        time: "20 mins",
    },
    Recipe {
        name: "Milk Smoothie",
        category: "Beverages",
        ingredients: &["beverages", "fruits", "dairy"],
        instructions: "1. Pour milk in blender\n2. Add fresh fruits\n3. Blend until smooth\n4. Add honey if needed",
        difficulty: "Easy",
        time: "5 mins",
    },
    Recipe {
        name: "Grilled Meat with Vegetables",
        category: "Main Course",
        ingredients: &["meats", "vegetables"],
        instructions: "1. Season meat with spices\n2. Grill until cooked\n3. Grill vegetables separately\n4. Serve together hot",
        difficulty: "Medium",
        time: "30 mins",
    },
    Recipe {
        name: "Fish Curry",
        category: "Main Course",
        ingredients: &["seafood", "spices", "vegetables"],
        instructions: "1. Heat oil and add spices\n2. Add chopped vegetables\n3. Add seafood\n4. Simmer until cooked, serve with rice",
        difficulty: "Hard",
        time: "40 mins",
    },
    Recipe {
        name: "Cheese Toast",
        category: "Breakfast",
        ingredients: &["bakery", "dairy"],
        instructions: "1. Toast bread until golden\n2. Add cheese on top\n3. Toast again until cheese melts\n4. Serve warm",
        difficulty: "Easy",
        time: "5 mins",
    },
    Recipe {
        name: "Rice with Vegetables",
        category: "Main Course",
        ingredients: &["grains", "vegetables"],
        instructions: "1. Cook rice in water\n2. Stir-fry vegetables separately\n3. Mix with cooked rice\n4. Season and serve",
        difficulty: "Medium",
        time: "25 mins",
    },
    Recipe {
        name: "Fruit Parfait",
        category: "Dessert",
        ingredients: &["fruits", "dairy"],
        instructions: "1. Layer yogurt in a glass\n2. Add fresh fruits\n3. Repeat layers\n4. Top with honey and enjoy",
        difficulty: "Easy",
        time: "5 mins",
    },
    Recipe {
        name: "Spiced Rice",
        category: "Main Course",
        ingredients: &["grains", "spices", "vegetables"],
        instructions: "1. Heat oil with spices\n2. Add rice and stir\n3. Add vegetables\n4. Cook until fluffy",
        difficulty: "Medium",
        time: "20 mins",
    },
    Recipe {
        name: "Seafood Pasta",
        category: "Main Course",
        ingredients: &["seafood", "grains", "vegetables"],
        instructions: "1. Cook pasta\n2. Sauté seafood with vegetables\n3. Mix with pasta\n4. Add condiments and serve",
        difficulty: "Hard",
        time: "35 mins",
    },
];

/// Rank the built-in recipes against `items`
///
/// An ingredient counts as available when some item's category name
/// contains it, or it contains the category name (both lowercased).
/// Recipes with no available ingredient are dropped; the rest are sorted by
/// match percentage, highest first, ties keeping list order.
pub fn suggest(items: &[Item]) -> Vec<RecipeMatch> {
    if items.is_empty() {
        return Vec::new();
    }

    let item_categories: Vec<String> = items
        .iter()
        .map(|i| i.category.name().to_lowercase())
        .collect();

    let mut matches: Vec<RecipeMatch> = RECIPES
        .iter()
        .filter_map(|recipe| {
            let matched: Vec<&'static str> = recipe
                .ingredients
                .iter()
                .copied()
                .filter(|needed| {
                    item_categories
                        .iter()
                        .any(|have| have.contains(needed) || needed.contains(have.as_str()))
                })
                .collect();

            if matched.is_empty() {
                return None;
            }

            Some(RecipeMatch {
                recipe,
                match_percentage: matched.len() as f64 / recipe.ingredients.len() as f64 * 100.0,
                matched_ingredients: matched,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.match_percentage.total_cmp(&a.match_percentage));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn items(categories: &[Category]) -> Vec<Item> {
        let expiry = NaiveDate::from_ymd_opt(2026, 10, 30).unwrap();
        categories
            .iter()
            .enumerate()
            .map(|(i, c)| Item::with_id(i as i64, "x", *c, expiry))
            .collect()
    }

    #[test]
    fn test_no_items_no_suggestions() {
        assert!(suggest(&[]).is_empty());
    }

    #[test]
    fn test_full_matches_come_first() {
        let suggestions = suggest(&items(&[Category::Bakery, Category::Dairy]));

        assert_eq!(suggestions[0].recipe.name, "Cheese Toast");
        assert_eq!(suggestions[0].match_percentage, 100.0);
        assert_eq!(suggestions[0].matched_ingredients, vec!["bakery", "dairy"]);

        for pair in suggestions.windows(2) {
            assert!(pair[0].match_percentage >= pair[1].match_percentage);
        }
    }

    #[test]
    fn test_compound_category_names_match_fragments() {
        let suggestions = suggest(&items(&[
            Category::GrainsAndPulses,
            Category::SpicesAndCondiments,
            Category::Vegetables,
        ]));

        let spiced = suggestions
            .iter()
            .find(|m| m.recipe.name == "Spiced Rice")
            .unwrap();
        assert_eq!(spiced.match_percentage, 100.0);
    }

    #[test]
    fn test_zero_matches_are_dropped() {
        let suggestions = suggest(&items(&[Category::Beverages]));

        let names: Vec<&str> = suggestions.iter().map(|m| m.recipe.name).collect();
        assert_eq!(names, vec!["Milk Smoothie"]);
        assert!((suggestions[0].match_percentage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_list_order() {
        let suggestions = suggest(&items(&[Category::Vegetables]));

        let halves: Vec<&str> = suggestions
            .iter()
            .filter(|m| m.match_percentage == 50.0)
            .map(|m| m.recipe.name)
            .collect();
        assert_eq!(
            halves,
            vec![
                "Fresh Salad",
                "Vegetable Stir-Fry",
                "Grilled Meat with Vegetables",
                "Rice with Vegetables"
            ]
        );
    }
}
