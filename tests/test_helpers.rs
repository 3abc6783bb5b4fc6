//! # Test Helper Library
//!
//! Common recipe fixtures shared by the integration tests.

#![allow(dead_code)]

use kitchen_prep::recipe_model::{OrderCounts, Recipe, RecipeBook};
use serde_json::json;

/// Build a recipe book from `(id, recipe)` pairs
pub fn recipe_book(recipes: Vec<(&str, Recipe)>) -> RecipeBook {
    recipes
        .into_iter()
        .map(|(id, recipe)| (id.to_string(), recipe))
        .collect()
}

/// Build a single-component recipe from ingredient lines
pub fn simple_recipe(name: &str, lines: &[&str]) -> Recipe {
    Recipe::new(name).with_component("main", lines.iter().copied())
}

/// Build order counts from `(id, count)` pairs
pub fn order_counts(counts: &[(&str, u32)]) -> OrderCounts {
    counts
        .iter()
        .fold(OrderCounts::new(), |acc, (id, count)| acc.with(id, *count))
}

/// A small service day: chili, tacos and bread with overlapping ingredients
pub fn sample_menu() -> RecipeBook {
    recipe_book(vec![
        (
            "bread",
            Recipe::new("Bread")
                .with_component("dough", ["2 cups flour", "1 tsp salt", "1 1/2 cups water"])
                .with_component("finish", ["olive oil as needed"]),
        ),
        (
            "chili",
            Recipe::new("Chili")
                .with_component(
                    "base",
                    [
                        "0.5 lb ground beef",
                        "1 onion, diced",
                        "3 cloves garlic, minced",
                        "1 can kidney beans",
                    ],
                )
                .with_component("seasoning", ["2 tbsp chili powder", "salt to taste"]),
        ),
        (
            "tacos",
            Recipe::new("Tacos")
                .with_component("filling", ["1 lb ground beef", "2 onions"])
                .with_component("toppings", ["1/2 cup sour cream", "salt to taste", "a pinch"]),
        ),
    ])
}

/// The sample menu in the recipe store's JSON shape
pub fn sample_menu_json() -> serde_json::Value {
    json!({
        "chili": {
            "name": "Chili",
            "components": {
                "base": [
                    "0.5 lb ground beef",
                    { "amount": "1", "ingredient": "onion", "prep": "diced" }
                ]
            }
        },
        "tacos": {
            "name": "Tacos",
            "components": {
                "filling": ["1 lb ground beef", "2 onions", "salt to taste"]
            }
        }
    })
}
