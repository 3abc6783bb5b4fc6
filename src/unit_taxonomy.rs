//! # Unit Taxonomy
//!
//! Static classification and conversion tables for the units that appear in
//! ingredient lines. Every unit string resolves to exactly one
//! [`UnitCategory`]; weight and volume amounts are accumulated in a base unit
//! (ounces and teaspoons) and converted back to a readable unit for display.
//!
//! ## Categories and base units
//!
//! | Category      | Base unit | Display                                  |
//! |---------------|-----------|------------------------------------------|
//! | `Weight`      | ounces    | `lbs` at 16 oz and above, `oz` below     |
//! | `Volume`      | teaspoons | `cups` ≥ 48 tsp, `tbsp` ≥ 3 tsp, `tsp`   |
//! | `Count`       | none      | one decimal, no suffix                   |
//! | `Descriptive` | none      | the raw description, no quantity         |
//!
//! The alias tables are built once and never mutated, so they are shared
//! freely between concurrent aggregation runs.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Category a unit belongs to; determines conversion and formatting
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// Mass units, accumulated in ounces
    Weight,
    /// Volume units, accumulated in teaspoons
    Volume,
    /// Countable items ("2 onions", "3 cloves garlic")
    Count,
    /// Unquantified mentions ("salt to taste", "a pinch")
    Descriptive,
}

impl UnitCategory {
    /// All categories in shopping-list section order
    pub const ALL: [UnitCategory; 4] = [
        UnitCategory::Weight,
        UnitCategory::Volume,
        UnitCategory::Count,
        UnitCategory::Descriptive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Weight => "weight",
            UnitCategory::Volume => "volume",
            UnitCategory::Count => "count",
            UnitCategory::Descriptive => "descriptive",
        }
    }

    /// Section heading used by the shopping list
    pub fn section_title(&self) -> &'static str {
        match self {
            UnitCategory::Weight => "Weight",
            UnitCategory::Volume => "Volume",
            UnitCategory::Count => "Count",
            UnitCategory::Descriptive => "Other",
        }
    }

    /// Base unit quantities of this category are accumulated in, if any
    pub fn base_unit(&self) -> Option<Unit> {
        match self {
            UnitCategory::Weight => Some(Unit::Ounces),
            UnitCategory::Volume => Some(Unit::Teaspoons),
            UnitCategory::Count | UnitCategory::Descriptive => None,
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Known measurement units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    // Weight
    Ounces,
    Pounds,
    Grams,
    Kilograms,

    // Volume
    Teaspoons,
    Tablespoons,
    FluidOunces,
    Cups,
    Pints,
    Quarts,
    Gallons,
    Milliliters,
    Liters,

    // Count
    Whole,
    Pieces,
    Cloves,
    Cans,
    Packages,
    Bunches,
    Slices,
    Sticks,
    Heads,
    Sprigs,
    Jars,
    Bags,

    // Descriptive
    Pinches,
    Dashes,
    Splashes,
    ToTaste,
    AsNeeded,
    Descriptive,
}

impl Unit {
    /// Category this unit belongs to
    pub fn category(&self) -> UnitCategory {
        match self {
            Unit::Ounces | Unit::Pounds | Unit::Grams | Unit::Kilograms => UnitCategory::Weight,
            Unit::Teaspoons
            | Unit::Tablespoons
            | Unit::FluidOunces
            | Unit::Cups
            | Unit::Pints
            | Unit::Quarts
            | Unit::Gallons
            | Unit::Milliliters
            | Unit::Liters => UnitCategory::Volume,
            Unit::Whole
            | Unit::Pieces
            | Unit::Cloves
            | Unit::Cans
            | Unit::Packages
            | Unit::Bunches
            | Unit::Slices
            | Unit::Sticks
            | Unit::Heads
            | Unit::Sprigs
            | Unit::Jars
            | Unit::Bags => UnitCategory::Count,
            Unit::Pinches
            | Unit::Dashes
            | Unit::Splashes
            | Unit::ToTaste
            | Unit::AsNeeded
            | Unit::Descriptive => UnitCategory::Descriptive,
        }
    }

    /// Multiplier from this unit to its category's base unit.
    ///
    /// These constants are the reference values for conversions; count and
    /// descriptive units pass amounts through unchanged.
    pub fn base_factor(&self) -> f64 {
        match self {
            Unit::Ounces => 1.0,
            Unit::Pounds => 16.0,
            Unit::Grams => 0.035274,
            Unit::Kilograms => 35.274,
            Unit::Teaspoons => 1.0,
            Unit::Tablespoons => 3.0,
            Unit::FluidOunces => 6.0,
            Unit::Cups => 48.0,
            Unit::Pints => 96.0,
            Unit::Quarts => 192.0,
            Unit::Gallons => 768.0,
            Unit::Milliliters => 0.202884,
            Unit::Liters => 202.884,
            _ => 1.0,
        }
    }
}

/// Unit string assigned by the parser when a number has no recognizable unit
pub const WHOLE_UNIT: &str = "whole";

/// Unit string assigned by the parser when a line has no leading number
pub const DESCRIPTIVE_UNIT: &str = "descriptive";

lazy_static! {
    /// Alias table in classification precedence order: weight, volume, count, descriptive
    static ref UNIT_ALIASES: Vec<(&'static str, Unit)> = vec![
        // Weight
        ("oz", Unit::Ounces),
        ("ounce", Unit::Ounces),
        ("ounces", Unit::Ounces),
        ("ozs", Unit::Ounces),
        ("lb", Unit::Pounds),
        ("lbs", Unit::Pounds),
        ("pound", Unit::Pounds),
        ("pounds", Unit::Pounds),
        ("g", Unit::Grams),
        ("gram", Unit::Grams),
        ("grams", Unit::Grams),
        ("kg", Unit::Kilograms),
        ("kilogram", Unit::Kilograms),
        ("kilograms", Unit::Kilograms),
        ("kgs", Unit::Kilograms),
        // Volume
        ("tsp", Unit::Teaspoons),
        ("teaspoon", Unit::Teaspoons),
        ("teaspoons", Unit::Teaspoons),
        ("tsps", Unit::Teaspoons),
        ("tbsp", Unit::Tablespoons),
        ("tbs", Unit::Tablespoons),
        ("tbsps", Unit::Tablespoons),
        ("tbl", Unit::Tablespoons),
        ("tbls", Unit::Tablespoons),
        ("tablespoon", Unit::Tablespoons),
        ("tablespoons", Unit::Tablespoons),
        ("fl oz", Unit::FluidOunces),
        ("fl. oz", Unit::FluidOunces),
        ("fluid ounce", Unit::FluidOunces),
        ("fluid ounces", Unit::FluidOunces),
        ("cup", Unit::Cups),
        ("cups", Unit::Cups),
        ("pint", Unit::Pints),
        ("pints", Unit::Pints),
        ("pt", Unit::Pints),
        ("quart", Unit::Quarts),
        ("quarts", Unit::Quarts),
        ("qt", Unit::Quarts),
        ("gallon", Unit::Gallons),
        ("gallons", Unit::Gallons),
        ("gal", Unit::Gallons),
        ("ml", Unit::Milliliters),
        ("milliliter", Unit::Milliliters),
        ("milliliters", Unit::Milliliters),
        ("millilitre", Unit::Milliliters),
        ("millilitres", Unit::Milliliters),
        ("l", Unit::Liters),
        ("liter", Unit::Liters),
        ("liters", Unit::Liters),
        ("litre", Unit::Liters),
        ("litres", Unit::Liters),
        // Count
        ("whole", Unit::Whole),
        ("each", Unit::Whole),
        ("ea", Unit::Whole),
        ("piece", Unit::Pieces),
        ("pieces", Unit::Pieces),
        ("clove", Unit::Cloves),
        ("cloves", Unit::Cloves),
        ("can", Unit::Cans),
        ("cans", Unit::Cans),
        ("package", Unit::Packages),
        ("packages", Unit::Packages),
        ("pkg", Unit::Packages),
        ("bunch", Unit::Bunches),
        ("bunches", Unit::Bunches),
        ("slice", Unit::Slices),
        ("slices", Unit::Slices),
        ("stick", Unit::Sticks),
        ("sticks", Unit::Sticks),
        ("head", Unit::Heads),
        ("heads", Unit::Heads),
        ("sprig", Unit::Sprigs),
        ("sprigs", Unit::Sprigs),
        ("jar", Unit::Jars),
        ("jars", Unit::Jars),
        ("bag", Unit::Bags),
        ("bags", Unit::Bags),
        // Descriptive
        ("pinch", Unit::Pinches),
        ("pinches", Unit::Pinches),
        ("dash", Unit::Dashes),
        ("dashes", Unit::Dashes),
        ("splash", Unit::Splashes),
        ("splashes", Unit::Splashes),
        ("to taste", Unit::ToTaste),
        ("as needed", Unit::AsNeeded),
        ("descriptive", Unit::Descriptive),
    ];

    static ref UNIT_LOOKUP: HashMap<&'static str, Unit> =
        UNIT_ALIASES.iter().map(|(alias, unit)| (*alias, *unit)).collect();
}

/// Unit phrases a parser may recognize directly after a number.
///
/// Excludes the internal `descriptive` marker, which never appears in recipe text.
pub fn unit_phrases() -> impl Iterator<Item = &'static str> {
    UNIT_ALIASES
        .iter()
        .filter(|(_, unit)| *unit != Unit::Descriptive)
        .map(|(alias, _)| *alias)
}

/// Lower-case, trim, collapse whitespace and drop a trailing period ("tbsp." -> "tbsp")
pub fn normalize_unit_text(unit: &str) -> String {
    let collapsed = unit
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase();
    collapsed.trim_end_matches('.').to_string()
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Word-level containment: every word of `alias` appears contiguously in `haystack`
fn contains_phrase(haystack: &[&str], alias: &str) -> bool {
    let needle = words(alias);
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle.as_slice())
}

/// Resolve a unit string to a known [`Unit`].
///
/// An exact alias match wins. Otherwise the unit string is searched for any
/// alias phrase in precedence order weight, volume, count, descriptive, so a
/// compound phrase like `"oz can"` resolves to ounces.
pub fn resolve_unit(unit: &str) -> Option<Unit> {
    let normalized = normalize_unit_text(unit);
    if normalized.is_empty() {
        return None;
    }

    if let Some(unit) = UNIT_LOOKUP.get(normalized.as_str()) {
        return Some(*unit);
    }

    let haystack = words(&normalized);
    for category in UnitCategory::ALL {
        let found = UNIT_ALIASES
            .iter()
            .filter(|(_, unit)| unit.category() == category)
            .find(|(alias, _)| contains_phrase(&haystack, alias));
        if let Some((_, unit)) = found {
            return Some(*unit);
        }
    }

    None
}

/// Classify a unit string; anything unrecognized counts as a `Count` unit
pub fn classify(unit: &str) -> UnitCategory {
    resolve_unit(unit)
        .map(|u| u.category())
        .unwrap_or(UnitCategory::Count)
}

/// Convert an amount in `unit` to the base unit of `category`.
///
/// Weight converts to ounces, volume to teaspoons; count and descriptive
/// amounts pass through unchanged. A unit that does not belong to `category`
/// is treated as already being in the base unit.
pub fn to_base(amount: f64, unit: &str, category: UnitCategory) -> f64 {
    match category {
        UnitCategory::Weight | UnitCategory::Volume => {
            let factor = resolve_unit(unit)
                .filter(|u| u.category() == category)
                .map(|u| u.base_factor())
                .unwrap_or(1.0);
            amount * factor
        }
        UnitCategory::Count | UnitCategory::Descriptive => amount,
    }
}

/// Render a base amount in the most readable unit of its category.
///
/// Descriptive entries carry no quantity, so an empty string is returned.
pub fn from_base(base_amount: f64, category: UnitCategory) -> String {
    match category {
        UnitCategory::Weight => {
            if base_amount >= Unit::Pounds.base_factor() {
                format!("{:.2} lbs", base_amount / Unit::Pounds.base_factor())
            } else {
                format!("{:.2} oz", base_amount)
            }
        }
        UnitCategory::Volume => {
            if base_amount >= Unit::Cups.base_factor() {
                format!("{:.2} cups", base_amount / Unit::Cups.base_factor())
            } else if base_amount >= Unit::Tablespoons.base_factor() {
                format!("{:.2} tbsp", base_amount / Unit::Tablespoons.base_factor())
            } else {
                format!("{:.2} tsp", base_amount)
            }
        }
        UnitCategory::Count => format!("{:.1}", base_amount),
        UnitCategory::Descriptive => String::new(),
    }
}
