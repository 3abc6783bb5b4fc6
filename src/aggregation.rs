//! # Aggregation Engine
//!
//! Combines the ingredient lines of every ordered recipe into one aggregate,
//! scaled by each recipe's order multiplier.
//!
//! For each line of each included recipe:
//!
//! ```text
//! parse -> classify -> descriptive?  -> dedup into the descriptive list
//!                   -> quantified    -> amount x multiplier -> base unit
//!                                    -> upsert by (category, normalized key)
//! ```
//!
//! Recipes are visited in id order, components in name order and lines in
//! list order, so the first-seen description and the example order are stable
//! across runs. Everything is recomputed on every call.
//!
//! ## Usage
//!
//! ```rust
//! use kitchen_prep::aggregation::ShoppingListEngine;
//! use kitchen_prep::recipe_model::{OrderCounts, Recipe, RecipeBook};
//!
//! let mut book = RecipeBook::new();
//! book.insert("bread", Recipe::new("Bread").with_component("dough", ["2 cups flour"]));
//! let counts = OrderCounts::new().with("bread", 3);
//!
//! let engine = ShoppingListEngine::new();
//! let aggregate = engine.aggregate(&book, &counts);
//! assert_eq!(aggregate.volume["flour"].base_amount, 288.0);
//! ```

use crate::config::{AppConfig, EngineConfig};
use crate::errors::{AppError, AppResult};
use crate::ingredient_parser::IngredientLineParser;
use crate::normalization::DescriptionNormalizer;
use crate::observability::{
    aggregation_span, record_aggregation_metrics, record_ingredient_line,
    record_validation_failure,
};
use crate::recipe_model::{OrderCounts, RecipeBook};
use crate::shopping_list::{format_shopping_list_with, ShoppingListSection};
use crate::unit_taxonomy::{classify, to_base, UnitCategory};
use crate::validation::validate_recipe_book;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where an aggregated quantity came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    #[serde(rename = "recipe")]
    pub recipe_name: String,
    #[serde(rename = "original")]
    pub original_text: String,
    #[serde(rename = "count")]
    pub multiplier: u32,
}

/// A quantified shopping-list entry accumulated in its category's base unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedEntry {
    /// First-seen description, used for display
    pub description: String,
    /// Grouping key
    pub normalized_description: String,
    pub category: UnitCategory,
    /// Ounces for weight, teaspoons for volume, items for count
    pub base_amount: f64,
    pub examples: Vec<Example>,
}

/// An unquantified mention, deduplicated by normalized description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveEntry {
    pub description: String,
    pub normalized_description: String,
    pub examples: Vec<Example>,
}

/// Result of one aggregation run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateStructure {
    pub weight: BTreeMap<String, AggregatedEntry>,
    pub volume: BTreeMap<String, AggregatedEntry>,
    pub count: BTreeMap<String, AggregatedEntry>,
    /// Descriptive entries in first-seen order
    pub descriptive: Vec<DescriptiveEntry>,
}

impl AggregateStructure {
    /// Quantified entries of a category; `None` for `Descriptive`
    pub fn entries(&self, category: UnitCategory) -> Option<&BTreeMap<String, AggregatedEntry>> {
        match category {
            UnitCategory::Weight => Some(&self.weight),
            UnitCategory::Volume => Some(&self.volume),
            UnitCategory::Count => Some(&self.count),
            UnitCategory::Descriptive => None,
        }
    }

    pub fn total_entries(&self) -> usize {
        self.weight.len() + self.volume.len() + self.count.len() + self.descriptive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_entries() == 0
    }
}

/// Counters for one aggregation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregationStats {
    pub recipes_included: usize,
    pub recipes_skipped: usize,
    pub lines_processed: usize,
    pub blank_lines_skipped: usize,
    pub descriptive_fallbacks: usize,
}

/// Accumulates parsed lines into an [`AggregateStructure`]
struct Accumulator {
    structure: AggregateStructure,
    descriptive_index: HashMap<String, usize>,
    stats: AggregationStats,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            structure: AggregateStructure::default(),
            descriptive_index: HashMap::new(),
            stats: AggregationStats::default(),
        }
    }

    fn add_descriptive(&mut self, description: &str, key: String, example: Example) {
        self.stats.descriptive_fallbacks += 1;
        match self.descriptive_index.get(&key) {
            Some(&index) => self.structure.descriptive[index].examples.push(example),
            None => {
                self.descriptive_index
                    .insert(key.clone(), self.structure.descriptive.len());
                self.structure.descriptive.push(DescriptiveEntry {
                    description: description.to_string(),
                    normalized_description: key,
                    examples: vec![example],
                });
            }
        }
    }

    fn add_quantified(
        &mut self,
        category: UnitCategory,
        description: &str,
        key: String,
        base_amount: f64,
        example: Example,
    ) {
        let entries = match category {
            UnitCategory::Weight => &mut self.structure.weight,
            UnitCategory::Volume => &mut self.structure.volume,
            UnitCategory::Count => &mut self.structure.count,
            UnitCategory::Descriptive => {
                self.add_descriptive(description, key, example);
                return;
            }
        };

        match entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.base_amount += base_amount;
                entry.examples.push(example);
            }
            Entry::Vacant(vacant) => {
                let normalized_description = vacant.key().clone();
                vacant.insert(AggregatedEntry {
                    description: description.to_string(),
                    normalized_description,
                    category,
                    base_amount,
                    examples: vec![example],
                });
            }
        }
    }
}

/// Aggregates recipes into a shopping list
#[derive(Debug)]
pub struct ShoppingListEngine {
    config: EngineConfig,
    parser: IngredientLineParser,
    normalizer: DescriptionNormalizer,
    record_metrics: bool,
}

impl Default for ShoppingListEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ShoppingListEngine {
    /// Engine with default limits and the default parser
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            parser: IngredientLineParser::new(),
            normalizer: DescriptionNormalizer::new(),
            record_metrics: true,
        }
    }

    /// Engine with validated custom limits
    pub fn with_config(config: EngineConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Engine configured from the full application configuration
    pub fn from_app_config(app_config: &AppConfig) -> AppResult<Self> {
        app_config.validate()?;
        Ok(Self {
            config: app_config.engine.clone(),
            record_metrics: app_config.observability.enable_metrics,
            ..Self::new()
        })
    }

    /// Replace the line parser (e.g. with a custom matcher order)
    pub fn with_parser(mut self, parser: IngredientLineParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Aggregate all recipes with a non-zero order count
    pub fn aggregate(&self, recipes: &RecipeBook, order_counts: &OrderCounts) -> AggregateStructure {
        self.aggregate_with_stats(recipes, order_counts).0
    }

    /// Aggregate and report per-run counters
    pub fn aggregate_with_stats(
        &self,
        recipes: &RecipeBook,
        order_counts: &OrderCounts,
    ) -> (AggregateStructure, AggregationStats) {
        let span = aggregation_span("aggregate");
        let _guard = span.enter();
        let start_time = Instant::now();

        let mut accumulator = Accumulator::new();

        for (recipe_id, recipe) in recipes.iter() {
            let multiplier = order_counts.get(recipe_id);
            if multiplier == 0 {
                accumulator.stats.recipes_skipped += 1;
                continue;
            }
            accumulator.stats.recipes_included += 1;

            for (component, entries) in &recipe.components {
                for entry in entries {
                    if entry.is_blank() {
                        accumulator.stats.blank_lines_skipped += 1;
                        continue;
                    }
                    accumulator.stats.lines_processed += 1;

                    let parsed = entry.parse(&self.parser);
                    let category = if parsed.is_descriptive() {
                        UnitCategory::Descriptive
                    } else {
                        classify(&parsed.unit)
                    };
                    if self.record_metrics {
                        record_ingredient_line(category);
                    }

                    let example = Example {
                        recipe_name: recipe.name.clone(),
                        original_text: parsed.original_text.clone(),
                        multiplier,
                    };

                    let base_amount = match (parsed.amount, category) {
                        (
                            Some(amount),
                            UnitCategory::Weight | UnitCategory::Volume | UnitCategory::Count,
                        ) => Some(to_base(amount * f64::from(multiplier), &parsed.unit, category)),
                        _ => None,
                    };

                    match base_amount {
                        Some(base_amount) if base_amount.is_finite() => {
                            let key = self.normalizer.normalize(&parsed.description);
                            debug!(
                                recipe_id = %recipe_id,
                                component = %component,
                                category = %category,
                                key = %key,
                                base_amount = base_amount,
                                "Accumulated ingredient line"
                            );
                            accumulator.add_quantified(
                                category,
                                &parsed.description,
                                key,
                                base_amount,
                                example,
                            );
                        }
                        Some(_) => {
                            // Scaled past f64; keep the line as written
                            let description = parsed.original_text.trim();
                            let key = self.normalizer.normalize(description);
                            warn!(
                                recipe_id = %recipe_id,
                                component = %component,
                                multiplier = multiplier,
                                "Scaled amount is not finite, line treated as descriptive"
                            );
                            accumulator.add_descriptive(description, key, example);
                        }
                        None => {
                            let key = self.normalizer.normalize(&parsed.description);
                            debug!(
                                recipe_id = %recipe_id,
                                component = %component,
                                key = %key,
                                "Ingredient line treated as descriptive"
                            );
                            accumulator.add_descriptive(&parsed.description, key, example);
                        }
                    }
                }
            }
        }

        let duration = start_time.elapsed();
        let stats = accumulator.stats;
        if self.record_metrics {
            record_aggregation_metrics(
                stats.recipes_included,
                stats.descriptive_fallbacks,
                duration,
            );
        }

        info!(
            recipes_included = stats.recipes_included,
            recipes_skipped = stats.recipes_skipped,
            lines_processed = stats.lines_processed,
            descriptive_fallbacks = stats.descriptive_fallbacks,
            entries = accumulator.structure.total_entries(),
            duration_ms = duration.as_millis() as u64,
            "Aggregation completed"
        );

        (accumulator.structure, stats)
    }

    /// Validate the caller contract, then aggregate
    pub fn aggregate_checked(
        &self,
        recipes: &RecipeBook,
        order_counts: &OrderCounts,
    ) -> AppResult<AggregateStructure> {
        validate_recipe_book(recipes, order_counts, &self.config).inspect_err(|_| {
            if self.record_metrics {
                record_validation_failure("aggregate");
            }
        })?;
        Ok(self.aggregate(recipes, order_counts))
    }

    /// Aggregate and format into shopping-list sections
    pub fn build_shopping_list(
        &self,
        recipes: &RecipeBook,
        order_counts: &OrderCounts,
    ) -> Vec<ShoppingListSection> {
        let aggregate = self.aggregate(recipes, order_counts);
        format_shopping_list_with(&aggregate, self.config.include_examples)
    }

    /// Validate, aggregate and format
    pub fn build_shopping_list_checked(
        &self,
        recipes: &RecipeBook,
        order_counts: &OrderCounts,
    ) -> AppResult<Vec<ShoppingListSection>> {
        let aggregate = self.aggregate_checked(recipes, order_counts)?;
        Ok(format_shopping_list_with(&aggregate, self.config.include_examples))
    }

    /// Build a shopping list from the recipe store's JSON documents
    pub fn shopping_list_from_json(
        &self,
        recipes_json: &str,
        order_counts_json: &str,
    ) -> AppResult<Vec<ShoppingListSection>> {
        let recipes = RecipeBook::from_json_str(recipes_json).map_err(|e| {
            if self.record_metrics {
                record_validation_failure("parse_recipes");
            }
            AppError::Validation(format!("Invalid recipes document: {}", e))
        })?;
        let order_counts = OrderCounts::from_json_str(order_counts_json).map_err(|e| {
            if self.record_metrics {
                record_validation_failure("parse_order_counts");
            }
            AppError::Validation(format!("Invalid order counts document: {}", e))
        })?;
        self.build_shopping_list_checked(&recipes, &order_counts)
    }
}

/// Aggregate with a default engine
pub fn aggregate(recipes: &RecipeBook, order_counts: &OrderCounts) -> AggregateStructure {
    ShoppingListEngine::new().aggregate(recipes, order_counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient_parser::BareNumberMatcher;
    use crate::recipe_model::Recipe;

    fn book(recipes: Vec<(&str, Recipe)>) -> RecipeBook {
        recipes
            .into_iter()
            .map(|(id, recipe)| (id.to_string(), recipe))
            .collect()
    }

    #[test]
    fn test_weight_lines_merge_across_recipes() {
        let recipes = book(vec![
            ("a", Recipe::new("Chili").with_component("base", ["0.5 lb ground beef"])),
            ("b", Recipe::new("Tacos").with_component("filling", ["1 lb ground beef"])),
        ]);
        let counts = OrderCounts::new().with("a", 2).with("b", 1);

        let result = aggregate(&recipes, &counts);
        let entry = &result.weight["ground beef"];
        assert_eq!(entry.base_amount, 32.0);
        assert_eq!(entry.examples.len(), 2);
        assert_eq!(entry.examples[0].recipe_name, "Chili");
        assert_eq!(entry.examples[0].multiplier, 2);
    }

    #[test]
    fn test_zero_and_absent_counts_contribute_nothing() {
        let recipes = book(vec![
            ("a", Recipe::new("A").with_component("x", ["2 cups flour"])),
            ("b", Recipe::new("B").with_component("x", ["2 cups flour"])),
        ]);
        let counts = OrderCounts::new().with("a", 0);

        let (result, stats) = ShoppingListEngine::new().aggregate_with_stats(&recipes, &counts);
        assert!(result.is_empty());
        assert_eq!(stats.recipes_skipped, 2);
        assert_eq!(stats.lines_processed, 0);
    }

    #[test]
    fn test_onion_variants_merge_into_one_count_entry() {
        let recipes = book(vec![(
            "a",
            Recipe::new("Salsa").with_component("x", ["1 onion, diced", "2 onions"]),
        )]);
        let counts = OrderCounts::new().with("a", 1);

        let result = aggregate(&recipes, &counts);
        assert_eq!(result.count.len(), 1);
        let entry = &result.count["onion"];
        assert_eq!(entry.base_amount, 3.0);
        assert_eq!(entry.description, "onion, diced");
    }

    #[test]
    fn test_descriptive_lines_are_deduplicated() {
        let recipes = book(vec![
            ("a", Recipe::new("A").with_component("x", ["salt to taste"])),
            ("b", Recipe::new("B").with_component("x", ["Salt to taste"])),
        ]);
        let counts = OrderCounts::new().with("a", 1).with("b", 4);

        let result = aggregate(&recipes, &counts);
        assert_eq!(result.descriptive.len(), 1);
        assert_eq!(result.descriptive[0].description, "salt to taste");
        assert_eq!(result.descriptive[0].examples.len(), 2);
    }

    #[test]
    fn test_descriptive_unit_lines_merge_by_ingredient() {
        let recipes = book(vec![
            ("a", Recipe::new("Paella").with_component("x", ["1 pinch saffron"])),
            ("b", Recipe::new("Risotto").with_component("x", ["2 pinches saffron"])),
            ("c", Recipe::new("Buns").with_component("x", ["saffron"])),
        ]);
        let counts = OrderCounts::new().with("a", 1).with("b", 1).with("c", 1);

        let result = aggregate(&recipes, &counts);
        assert!(result.weight.is_empty() && result.volume.is_empty() && result.count.is_empty());
        assert_eq!(result.descriptive.len(), 1);
        let entry = &result.descriptive[0];
        assert_eq!(entry.description, "saffron");
        assert_eq!(entry.examples.len(), 3);
        assert_eq!(entry.examples[1].original_text, "2 pinches saffron");
    }

    #[test]
    fn test_plural_abbreviations_merge_with_singular() {
        let recipes = book(vec![(
            "a",
            Recipe::new("A").with_component("x", ["2 tsps salt", "1 tsp salt", "2 tbsps sugar"]),
        )]);
        let counts = OrderCounts::new().with("a", 1);

        let result = aggregate(&recipes, &counts);
        assert!(result.descriptive.is_empty());
        assert_eq!(result.volume["salt"].base_amount, 3.0);
        assert_eq!(result.volume["salt"].examples.len(), 2);
        assert_eq!(result.volume["sugar"].base_amount, 6.0);
    }

    #[test]
    fn test_overflowing_scaled_amount_is_descriptive() {
        let line = format!("1{} gallons stock", "0".repeat(306));
        let recipes = book(vec![("a", Recipe::new("A").with_component("x", [line.as_str()]))]);
        let counts = OrderCounts::new().with("a", 1);

        let result = aggregate(&recipes, &counts);
        assert!(result.volume.is_empty());
        assert_eq!(result.descriptive[0].description, line);
    }

    #[test]
    fn test_engine_uses_custom_parser() {
        let engine = ShoppingListEngine::new()
            .with_parser(IngredientLineParser::with_matchers(vec![Box::new(BareNumberMatcher)]));
        let recipes = book(vec![("a", Recipe::new("A").with_component("x", ["2 cups flour"]))]);
        let counts = OrderCounts::new().with("a", 1);

        let result = engine.aggregate(&recipes, &counts);
        assert!(result.volume.is_empty());
        assert_eq!(result.count["cups flour"].base_amount, 2.0);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let recipes = book(vec![(
            "a",
            Recipe::new("A").with_component("x", ["", "   ", "1 egg"]),
        )]);
        let counts = OrderCounts::new().with("a", 1);

        let (result, stats) = ShoppingListEngine::new().aggregate_with_stats(&recipes, &counts);
        assert_eq!(stats.blank_lines_skipped, 2);
        assert_eq!(stats.lines_processed, 1);
        assert!(result.descriptive.is_empty());
        assert_eq!(result.count["egg"].base_amount, 1.0);
    }

    #[test]
    fn test_same_key_in_two_categories_stays_separate() {
        let recipes = book(vec![(
            "a",
            Recipe::new("A").with_component("x", ["1 cup butter", "4 oz butter"]),
        )]);
        let counts = OrderCounts::new().with("a", 1);

        let result = aggregate(&recipes, &counts);
        assert_eq!(result.volume["butter"].base_amount, 48.0);
        assert_eq!(result.weight["butter"].base_amount, 4.0);
    }

    #[test]
    fn test_with_config_rejects_invalid_limits() {
        let config = EngineConfig {
            max_line_length: 0,
            ..EngineConfig::default()
        };
        assert!(ShoppingListEngine::with_config(config).is_err());
    }

    #[test]
    fn test_aggregate_checked_rejects_order_ceiling() {
        let engine = ShoppingListEngine::with_config(EngineConfig {
            max_order_count: 5,
            ..EngineConfig::default()
        })
        .unwrap();
        let recipes = book(vec![("a", Recipe::new("A").with_component("x", ["1 egg"]))]);
        let counts = OrderCounts::new().with("a", 6);

        let err = engine.aggregate_checked(&recipes, &counts).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
