//! # Kitchen Prep
//!
//! Ingredient aggregation and shopping-list engine. Parses free-text
//! ingredient quantities, converts them across a small unit taxonomy, merges
//! near-duplicate descriptions and scales everything by per-recipe order
//! counts to produce a deterministic, categorized shopping list.

pub mod aggregation;
pub mod config;
pub mod errors;
pub mod ingredient_parser;
pub mod measurement_patterns;
pub mod normalization;
pub mod observability;
pub mod observability_config;
pub mod recipe_model;
pub mod shopping_list;
pub mod unit_taxonomy;
pub mod validation;

// Re-export types for easier access
pub use aggregation::{aggregate, AggregateStructure, AggregationStats, ShoppingListEngine};
pub use errors::{AppError, AppResult};
pub use ingredient_parser::{parse_ingredient_line, IngredientLineParser, ParsedIngredient};
pub use normalization::normalize_description;
pub use recipe_model::{IngredientEntry, OrderCounts, Recipe, RecipeBook, StructuredIngredient};
pub use shopping_list::{format_shopping_list, to_plain_text, DisplayItem, ShoppingListSection};
pub use unit_taxonomy::{classify, from_base, to_base, UnitCategory};
