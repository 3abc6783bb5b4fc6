//! Validation module for the caller contract of the aggregation engine
//!
//! Parsing never rejects a line, so these checks cover only input that breaks
//! the contract at the call boundary:
//!
//! - Recipe identifiers and names
//! - Ingredient lines (length, control characters)
//! - Structured ingredient records
//! - Order multipliers
//!
//! Every failure is logged through [`error_logging`] and returned as
//! [`AppError::Validation`].

use crate::config::EngineConfig;
use crate::errors::{error_logging, AppError, AppResult};
use crate::recipe_model::{IngredientEntry, OrderCounts, QuantityValue, RecipeBook};

fn reject(
    message: String,
    operation: &str,
    recipe_id: Option<&str>,
    input_type: &str,
    input_value: Option<&str>,
) -> AppError {
    let error = AppError::Validation(message);
    error_logging::log_validation_error(&error, operation, recipe_id, input_type, input_value);
    error
}

/// Validates a recipe identifier
///
/// # Examples
/// ```
/// use kitchen_prep::validation::validate_recipe_id;
///
/// assert!(validate_recipe_id("chili").is_ok());
/// assert!(validate_recipe_id("  ").is_err());
/// ```
pub fn validate_recipe_id(recipe_id: &str) -> AppResult<()> {
    if recipe_id.trim().is_empty() {
        return Err(reject(
            "Recipe id cannot be empty".to_string(),
            "validate_recipe_id",
            None,
            "recipe_id",
            Some(recipe_id),
        ));
    }
    Ok(())
}

/// Validates a recipe name input
///
/// # Arguments
/// * `recipe_id` - Identifier of the recipe, for error context
/// * `name` - The recipe name to validate
/// * `max_length` - Longest accepted name in characters
///
/// # Examples
/// ```
/// use kitchen_prep::validation::validate_recipe_name;
///
/// assert!(validate_recipe_name("chili", "Chili con Carne", 255).is_ok());
/// assert!(validate_recipe_name("chili", "", 255).is_err());
/// assert!(validate_recipe_name("chili", &"a".repeat(256), 255).is_err());
/// ```
pub fn validate_recipe_name(recipe_id: &str, name: &str, max_length: usize) -> AppResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(reject(
            format!("Recipe '{}' has an empty name", recipe_id),
            "validate_recipe_name",
            Some(recipe_id),
            "recipe_name",
            Some(name),
        ));
    }

    let length = trimmed.chars().count();
    if length > max_length {
        return Err(reject(
            format!(
                "Recipe '{}' name is {} characters, limit is {}",
                recipe_id, length, max_length
            ),
            "validate_recipe_name",
            Some(recipe_id),
            "recipe_name",
            Some(name),
        ));
    }

    Ok(())
}

/// Validates one free-text ingredient line.
///
/// Blank lines are accepted; the engine skips them.
///
/// # Examples
/// ```
/// use kitchen_prep::validation::validate_ingredient_line;
///
/// assert!(validate_ingredient_line("chili", "1/2 lb ground beef", 500).is_ok());
/// assert!(validate_ingredient_line("chili", "", 500).is_ok());
/// assert!(validate_ingredient_line("chili", "salt\u{0}", 500).is_err());
/// ```
pub fn validate_ingredient_line(recipe_id: &str, line: &str, max_length: usize) -> AppResult<()> {
    let length = line.chars().count();
    if length > max_length {
        return Err(reject(
            format!(
                "Ingredient line in recipe '{}' is {} characters, limit is {}",
                recipe_id, length, max_length
            ),
            "validate_ingredient_line",
            Some(recipe_id),
            "ingredient_line",
            Some(line),
        ));
    }

    if line.chars().any(|c| c.is_control() && c != '\t') {
        return Err(reject(
            format!(
                "Ingredient line in recipe '{}' contains control characters",
                recipe_id
            ),
            "validate_ingredient_line",
            Some(recipe_id),
            "ingredient_line",
            Some(line),
        ));
    }

    Ok(())
}

/// Validates one ingredient entry, text or structured
pub fn validate_ingredient_entry(
    recipe_id: &str,
    entry: &IngredientEntry,
    max_length: usize,
) -> AppResult<()> {
    match entry {
        IngredientEntry::Text(line) => validate_ingredient_line(recipe_id, line, max_length),
        IngredientEntry::Structured(record) => {
            if record.ingredient.trim().is_empty() {
                return Err(reject(
                    format!(
                        "Structured ingredient in recipe '{}' has no ingredient name",
                        recipe_id
                    ),
                    "validate_ingredient_entry",
                    Some(recipe_id),
                    "structured_ingredient",
                    None,
                ));
            }

            if let Some(QuantityValue::Number(amount)) = record.amount {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(reject(
                        format!(
                            "Structured ingredient '{}' in recipe '{}' has invalid amount {}",
                            record.ingredient, recipe_id, amount
                        ),
                        "validate_ingredient_entry",
                        Some(recipe_id),
                        "structured_amount",
                        Some(&record.ingredient),
                    ));
                }
            }

            validate_ingredient_line(recipe_id, &record.to_line(), max_length)
        }
    }
}

/// Validates an order multiplier against the configured ceiling
///
/// # Examples
/// ```
/// use kitchen_prep::validation::validate_order_count;
///
/// assert!(validate_order_count("chili", 0, 1000).is_ok());
/// assert!(validate_order_count("chili", 1001, 1000).is_err());
/// ```
pub fn validate_order_count(recipe_id: &str, count: u32, max_count: u32) -> AppResult<()> {
    if count > max_count {
        let value = count.to_string();
        return Err(reject(
            format!(
                "Order count {} for recipe '{}' exceeds the limit of {}",
                count, recipe_id, max_count
            ),
            "validate_order_count",
            Some(recipe_id),
            "order_count",
            Some(&value),
        ));
    }
    Ok(())
}

/// Validates every recipe and order count before aggregation.
///
/// Order counts for ids missing from the book are checked against the
/// ceiling but otherwise ignored.
pub fn validate_recipe_book(
    recipes: &RecipeBook,
    order_counts: &OrderCounts,
    config: &EngineConfig,
) -> AppResult<()> {
    for (recipe_id, recipe) in recipes.iter() {
        validate_recipe_id(recipe_id)?;
        validate_recipe_name(recipe_id, &recipe.name, config.max_recipe_name_length)?;

        for entries in recipe.components.values() {
            for entry in entries {
                validate_ingredient_entry(recipe_id, entry, config.max_line_length)?;
            }
        }
    }

    for (recipe_id, count) in order_counts.iter() {
        validate_order_count(recipe_id, *count, config.max_order_count)?;
    }

    Ok(())
}
