//! # Recipe Data Model
//!
//! Typed input for the aggregation engine: recipes with named components,
//! ingredient entries, and per-recipe order counts.
//!
//! An ingredient entry is either a free-text line (`"1/2 lb ground beef"`) or
//! a structured record as stored by the recipe store:
//!
//! ```json
//! { "amount": "1/2", "unit": "lb", "ingredient": "ground beef", "prep": "browned" }
//! ```
//!
//! Structured records are read field by field, so their unit and description
//! never go through line parsing.
//!
//! ## Usage
//!
//! ```rust
//! use kitchen_prep::recipe_model::{OrderCounts, Recipe, RecipeBook};
//!
//! let mut book = RecipeBook::new();
//! book.insert(
//!     "chili",
//!     Recipe::new("Chili").with_component("base", ["1 lb ground beef", "2 onions"]),
//! );
//!
//! let mut counts = OrderCounts::new();
//! counts.set("chili", 3);
//! assert_eq!(counts.get("chili"), 3);
//! assert_eq!(counts.get("tacos"), 0);
//! ```

use crate::errors::AppResult;
use crate::ingredient_parser::{parse_quantity, IngredientLineParser, ParsedIngredient};
use crate::unit_taxonomy::normalize_unit_text;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recipe identifier as used by the recipe store
pub type RecipeId = String;

/// Amount field of a structured record: a JSON number or text like "1/2"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityValue {
    Number(f64),
    Text(String),
}

impl QuantityValue {
    /// Numeric value, if it is a finite non-negative number or parseable text
    pub fn value(&self) -> Option<f64> {
        match self {
            QuantityValue::Number(n) if n.is_finite() && *n >= 0.0 => Some(*n),
            QuantityValue::Number(_) => None,
            QuantityValue::Text(text) => parse_quantity(text),
        }
    }
}

impl std::fmt::Display for QuantityValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantityValue::Number(n) => write!(f, "{}", n),
            QuantityValue::Text(text) => write!(f, "{}", text.trim()),
        }
    }
}

/// Ingredient record with separate amount, unit, ingredient and preparation fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredIngredient {
    #[serde(default)]
    pub amount: Option<QuantityValue>,
    #[serde(default)]
    pub unit: Option<String>,
    pub ingredient: String,
    #[serde(default)]
    pub prep: Option<String>,
}

impl StructuredIngredient {
    pub fn new(ingredient: &str) -> Self {
        Self {
            amount: None,
            unit: None,
            ingredient: ingredient.to_string(),
            prep: None,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(QuantityValue::Number(amount));
        self
    }

    pub fn with_amount_text(mut self, amount: &str) -> Self {
        self.amount = Some(QuantityValue::Text(amount.to_string()));
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_prep(mut self, prep: &str) -> Self {
        self.prep = Some(prep.to_string());
        self
    }

    /// Description as shown on the shopping list: "onion, diced"
    pub fn description(&self) -> String {
        let ingredient = self.ingredient.trim();
        match self.prep.as_deref().map(str::trim) {
            Some(prep) if !prep.is_empty() => format!("{}, {}", ingredient, prep),
            _ => ingredient.to_string(),
        }
    }

    /// Single-line rendering used for provenance ("1/2 lb ground beef, browned")
    pub fn to_line(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(amount) = &self.amount {
            parts.push(amount.to_string());
        }
        if let Some(unit) = self.unit.as_deref().map(str::trim) {
            if !unit.is_empty() {
                parts.push(unit.to_string());
            }
        }
        parts.push(self.description());
        parts.join(" ")
    }

    /// Convert into a parsed ingredient without going through text parsing
    pub fn to_parsed(&self) -> ParsedIngredient {
        let original_text = self.to_line();
        match self.amount.as_ref().and_then(QuantityValue::value) {
            Some(amount) => {
                let unit = self
                    .unit
                    .as_deref()
                    .map(normalize_unit_text)
                    .filter(|u| !u.is_empty());
                ParsedIngredient::quantified(
                    amount,
                    unit.as_deref(),
                    &self.description(),
                    &original_text,
                )
            }
            None => {
                let mut parsed = ParsedIngredient::descriptive(&self.description());
                parsed.original_text = original_text;
                parsed
            }
        }
    }
}

/// One ingredient mention in a recipe component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientEntry {
    Text(String),
    Structured(StructuredIngredient),
}

impl IngredientEntry {
    /// Parse this entry; text goes through the line parser, records are read directly
    pub fn parse(&self, parser: &IngredientLineParser) -> ParsedIngredient {
        match self {
            IngredientEntry::Text(line) => parser.parse(line),
            IngredientEntry::Structured(record) => record.to_parsed(),
        }
    }

    /// Text used in validation and provenance
    pub fn original_text(&self) -> String {
        match self {
            IngredientEntry::Text(line) => line.clone(),
            IngredientEntry::Structured(record) => record.to_line(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            IngredientEntry::Text(line) => line.trim().is_empty(),
            IngredientEntry::Structured(record) => record.ingredient.trim().is_empty(),
        }
    }
}

impl From<&str> for IngredientEntry {
    fn from(line: &str) -> Self {
        IngredientEntry::Text(line.to_string())
    }
}

impl From<String> for IngredientEntry {
    fn from(line: String) -> Self {
        IngredientEntry::Text(line)
    }
}

impl From<StructuredIngredient> for IngredientEntry {
    fn from(record: StructuredIngredient) -> Self {
        IngredientEntry::Structured(record)
    }
}

/// A recipe: display name plus ingredient entries grouped by component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub components: BTreeMap<String, Vec<IngredientEntry>>,
}

impl Recipe {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            components: BTreeMap::new(),
        }
    }

    /// Add (or extend) a component with the given entries
    pub fn with_component<I, E>(mut self, component: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<IngredientEntry>,
    {
        self.components
            .entry(component.to_string())
            .or_default()
            .extend(entries.into_iter().map(Into::into));
        self
    }

    /// Total number of ingredient entries across components
    pub fn entry_count(&self) -> usize {
        self.components.values().map(Vec::len).sum()
    }
}

/// All recipes, iterated in recipe-id order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeBook {
    recipes: BTreeMap<RecipeId, Recipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the recipe store's JSON shape: `{ "<id>": { "name", "components" } }`
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> AppResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn insert(&mut self, id: &str, recipe: Recipe) -> Option<Recipe> {
        self.recipes.insert(id.to_string(), recipe)
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecipeId, &Recipe)> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl FromIterator<(RecipeId, Recipe)> for RecipeBook {
    fn from_iter<T: IntoIterator<Item = (RecipeId, Recipe)>>(iter: T) -> Self {
        Self {
            recipes: iter.into_iter().collect(),
        }
    }
}

/// Order multiplier per recipe; an absent recipe counts as zero
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderCounts {
    counts: BTreeMap<RecipeId, u32>,
}

impl OrderCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "<id>": <non-negative integer> }`; negative or fractional counts are rejected
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> AppResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn set(&mut self, id: &str, count: u32) {
        self.counts.insert(id.to_string(), count);
    }

    pub fn with(mut self, id: &str, count: u32) -> Self {
        self.set(id, count);
        self
    }

    pub fn get(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecipeId, &u32)> {
        self.counts.iter()
    }
}
