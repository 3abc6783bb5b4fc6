//! # Ingredient Line Parser
//!
//! Turns a raw ingredient line into an amount, a unit and a description.
//! Parsing never fails: every line has a defined outcome, and lines without a
//! leading amount become descriptive entries.
//!
//! ## Matching order
//!
//! The parser holds an ordered list of independent [`LineMatcher`]s. Each one
//! either recognizes the whole line or declines, and the first match wins:
//!
//! ```text
//! "1-2 cups stock"         range            amount 1.5, unit "cups"
//! "1/0 cup sugar"          zero denominator descriptive
//! "1 1/2 cups milk"        mixed number     amount 1.5, unit "cups"
//! "1/2 lb ground beef"     fraction         amount 0.5, unit "lb"
//! "½ cup sugar"            vulgar fraction  amount 0.5, unit "cup"
//! "0.5 lb ground beef"     number + unit    amount 0.5, unit "lb"
//! "2 onions"               bare number      amount 2,   unit "whole"
//! "salt to taste"          (no match)       amount None, unit "descriptive"
//! ```
//!
//! Adding a new format means adding a matcher, not editing a cascade.
//!
//! ## Usage
//!
//! ```rust
//! use kitchen_prep::ingredient_parser::parse_ingredient_line;
//!
//! let parsed = parse_ingredient_line("1/2 lb ground beef");
//! assert_eq!(parsed.amount, Some(0.5));
//! assert_eq!(parsed.unit, "lb");
//! assert_eq!(parsed.description, "ground beef");
//! ```

use crate::measurement_patterns::{
    vulgar_fraction_value, BARE_NUMBER_REGEX, DECIMAL_QUANTITY_REGEX, DECIMAL_WITH_UNIT_REGEX,
    FRACTION_QUANTITY_REGEX, FRACTION_REGEX, MIXED_NUMBER_REGEX, MIXED_QUANTITY_REGEX,
    RANGE_QUANTITY_REGEX, RANGE_REGEX, VULGAR_FRACTION_REGEX, VULGAR_QUANTITY_REGEX,
    ZERO_DENOMINATOR_REGEX,
};
use crate::unit_taxonomy::{normalize_unit_text, DESCRIPTIVE_UNIT, WHOLE_UNIT};
use lazy_static::lazy_static;
use regex::Captures;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A structured view of one ingredient line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    /// Numeric amount; `None` for descriptive lines
    pub amount: Option<f64>,
    /// Lower-cased unit text ("lb", "cups", "whole", "descriptive")
    pub unit: String,
    /// Trimmed description ("ground beef", "onion, diced")
    pub description: String,
    /// The line as it was supplied
    pub original_text: String,
}

impl ParsedIngredient {
    /// A line with no usable amount
    pub fn descriptive(original_text: &str) -> Self {
        Self {
            amount: None,
            unit: DESCRIPTIVE_UNIT.to_string(),
            description: original_text.trim().to_string(),
            original_text: original_text.to_string(),
        }
    }

    /// A quantified line; a missing unit becomes `"whole"`
    pub fn quantified(
        amount: f64,
        unit: Option<&str>,
        description: &str,
        original_text: &str,
    ) -> Self {
        let unit = unit
            .map(normalize_unit_text)
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| WHOLE_UNIT.to_string());
        Self {
            amount: Some(amount),
            unit,
            description: description.trim().to_string(),
            original_text: original_text.to_string(),
        }
    }

    pub fn is_descriptive(&self) -> bool {
        self.amount.is_none()
    }
}

/// One recognizable line format
pub trait LineMatcher: Send + Sync {
    /// Short name used in trace logs
    fn name(&self) -> &'static str;

    /// Parse `line` if it has this matcher's shape
    fn try_match(&self, line: &str) -> Option<ParsedIngredient>;
}

fn capture_str<'t>(captures: &Captures<'t>, name: &str) -> Option<&'t str> {
    captures.name(name).map(|m| m.as_str())
}

/// Amounts too large to represent are unreadable
fn capture_number(captures: &Captures<'_>, name: &str) -> Option<f64> {
    capture_str(captures, name)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn range_value(captures: &Captures<'_>) -> Option<f64> {
    let low = capture_number(captures, "low")?;
    let high = capture_number(captures, "high")?;
    Some(low / 2.0 + high / 2.0)
}

fn fraction_value(captures: &Captures<'_>) -> Option<f64> {
    let numerator = capture_number(captures, "num")?;
    let denominator = capture_number(captures, "den")?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|value| value.is_finite())
}

fn mixed_value(captures: &Captures<'_>) -> Option<f64> {
    let whole = capture_number(captures, "whole")?;
    Some(whole + fraction_value(captures)?).filter(|value| value.is_finite())
}

fn vulgar_value(captures: &Captures<'_>) -> Option<f64> {
    let whole = match capture_str(captures, "whole") {
        Some(_) => capture_number(captures, "whole")?,
        None => 0.0,
    };
    let fraction = capture_str(captures, "vulgar")?
        .chars()
        .next()
        .and_then(vulgar_fraction_value)?;
    Some(whole + fraction)
}

/// A quantity with nothing left to buy ("1/2", "2 cups") stays descriptive
fn quantified_from(captures: &Captures<'_>, amount: f64, line: &str) -> ParsedIngredient {
    let description = capture_str(captures, "description").unwrap_or("").trim();
    if description.is_empty() {
        return ParsedIngredient::descriptive(line);
    }
    ParsedIngredient::quantified(amount, capture_str(captures, "unit"), description, line)
}

/// "1-2 cups stock", "2 to 3 onions": the midpoint of the range
#[derive(Debug, Default, Clone, Copy)]
pub struct RangeMatcher;

impl LineMatcher for RangeMatcher {
    fn name(&self) -> &'static str {
        "range"
    }

    fn try_match(&self, line: &str) -> Option<ParsedIngredient> {
        let captures = RANGE_REGEX.captures(line)?;
        let amount = range_value(&captures)?;
        Some(quantified_from(&captures, amount, line))
    }
}

/// Fractions with a zero denominator are unreadable and stay descriptive
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroDenominatorMatcher;

impl LineMatcher for ZeroDenominatorMatcher {
    fn name(&self) -> &'static str {
        "zero_denominator"
    }

    fn try_match(&self, line: &str) -> Option<ParsedIngredient> {
        if ZERO_DENOMINATOR_REGEX.is_match(line) {
            Some(ParsedIngredient::descriptive(line))
        } else {
            None
        }
    }
}

/// "1 1/2 cups milk"
#[derive(Debug, Default, Clone, Copy)]
pub struct MixedNumberMatcher;

impl LineMatcher for MixedNumberMatcher {
    fn name(&self) -> &'static str {
        "mixed_number"
    }

    fn try_match(&self, line: &str) -> Option<ParsedIngredient> {
        let captures = MIXED_NUMBER_REGEX.captures(line)?;
        let amount = mixed_value(&captures)?;
        Some(quantified_from(&captures, amount, line))
    }
}

/// "1/2 lb ground beef"
#[derive(Debug, Default, Clone, Copy)]
pub struct FractionMatcher;

impl LineMatcher for FractionMatcher {
    fn name(&self) -> &'static str {
        "fraction"
    }

    fn try_match(&self, line: &str) -> Option<ParsedIngredient> {
        let captures = FRACTION_REGEX.captures(line)?;
        let amount = fraction_value(&captures)?;
        Some(quantified_from(&captures, amount, line))
    }
}

/// "½ cup sugar", "2¼ cups flour"
#[derive(Debug, Default, Clone, Copy)]
pub struct VulgarFractionMatcher;

impl LineMatcher for VulgarFractionMatcher {
    fn name(&self) -> &'static str {
        "vulgar_fraction"
    }

    fn try_match(&self, line: &str) -> Option<ParsedIngredient> {
        let captures = VULGAR_FRACTION_REGEX.captures(line)?;
        let amount = vulgar_value(&captures)?;
        Some(quantified_from(&captures, amount, line))
    }
}

/// "0.5 lb ground beef", "500g butter"
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberWithUnitMatcher;

impl LineMatcher for NumberWithUnitMatcher {
    fn name(&self) -> &'static str {
        "number_with_unit"
    }

    fn try_match(&self, line: &str) -> Option<ParsedIngredient> {
        let captures = DECIMAL_WITH_UNIT_REGEX.captures(line)?;
        let amount = capture_number(&captures, "amount")?;
        Some(quantified_from(&captures, amount, line))
    }
}

/// "2 onions": a number followed directly by the description
#[derive(Debug, Default, Clone, Copy)]
pub struct BareNumberMatcher;

impl LineMatcher for BareNumberMatcher {
    fn name(&self) -> &'static str {
        "bare_number"
    }

    fn try_match(&self, line: &str) -> Option<ParsedIngredient> {
        let captures = BARE_NUMBER_REGEX.captures(line)?;
        let amount = capture_number(&captures, "amount")?;
        Some(quantified_from(&captures, amount, line))
    }
}

/// Ordered matcher chain with a descriptive fallback
pub struct IngredientLineParser {
    matchers: Vec<Box<dyn LineMatcher>>,
}

impl IngredientLineParser {
    /// Parser with the default matcher order
    pub fn new() -> Self {
        Self {
            matchers: vec![
                Box::new(RangeMatcher),
                Box::new(ZeroDenominatorMatcher),
                Box::new(MixedNumberMatcher),
                Box::new(FractionMatcher),
                Box::new(VulgarFractionMatcher),
                Box::new(NumberWithUnitMatcher),
                Box::new(BareNumberMatcher),
            ],
        }
    }

    /// Parser with a caller-supplied matcher order
    pub fn with_matchers(matchers: Vec<Box<dyn LineMatcher>>) -> Self {
        Self { matchers }
    }

    /// Names of the matchers in the order they are tried
    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Parse one ingredient line. Never fails.
    pub fn parse(&self, line: &str) -> ParsedIngredient {
        let trimmed = line.trim();

        for matcher in &self.matchers {
            if let Some(mut parsed) = matcher.try_match(trimmed) {
                parsed.original_text = line.to_string();
                trace!(
                    line = %line,
                    matcher = matcher.name(),
                    amount = ?parsed.amount,
                    unit = %parsed.unit,
                    "Parsed ingredient line"
                );
                return parsed;
            }
        }

        trace!(line = %line, "No numeric pattern matched, treating line as descriptive");
        ParsedIngredient::descriptive(line)
    }
}

impl Default for IngredientLineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IngredientLineParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngredientLineParser")
            .field("matchers", &self.matcher_names())
            .finish()
    }
}

lazy_static! {
    static ref DEFAULT_PARSER: IngredientLineParser = IngredientLineParser::new();
}

/// Parse a line with the default matcher chain
pub fn parse_ingredient_line(line: &str) -> ParsedIngredient {
    DEFAULT_PARSER.parse(line)
}

/// Parse a bare quantity string ("1/2", "1 1/2", "0.75", "½", "2-3").
///
/// Used for structured records whose amount field is kept as text.
pub fn parse_quantity(quantity: &str) -> Option<f64> {
    let quantity = quantity.trim();

    if let Some(captures) = RANGE_QUANTITY_REGEX.captures(quantity) {
        return range_value(&captures);
    }
    if let Some(captures) = MIXED_QUANTITY_REGEX.captures(quantity) {
        return mixed_value(&captures);
    }
    if let Some(captures) = FRACTION_QUANTITY_REGEX.captures(quantity) {
        return fraction_value(&captures);
    }
    if let Some(captures) = VULGAR_QUANTITY_REGEX.captures(quantity) {
        return vulgar_value(&captures);
    }
    DECIMAL_QUANTITY_REGEX
        .captures(quantity)
        .and_then(|captures| capture_number(&captures, "amount"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fraction_with_unit() {
        let parsed = parse_ingredient_line("1/2 lb ground beef");
        assert_eq!(parsed.amount, Some(0.5));
        assert_eq!(parsed.unit, "lb");
        assert_eq!(parsed.description, "ground beef");
        assert_eq!(parsed.original_text, "1/2 lb ground beef");
    }

    #[test]
    fn test_parse_decimal_with_unit() {
        let parsed = parse_ingredient_line("0.5 lb ground beef");
        assert_eq!(parsed.amount, Some(0.5));
        assert_eq!(parsed.unit, "lb");
        assert_eq!(parsed.description, "ground beef");

        let parsed = parse_ingredient_line("2 Cups flour");
        assert_eq!(parsed.amount, Some(2.0));
        assert_eq!(parsed.unit, "cups");
        assert_eq!(parsed.description, "flour");
    }

    #[test]
    fn test_parse_unit_without_space() {
        let parsed = parse_ingredient_line("500g butter");
        assert_eq!(parsed.amount, Some(500.0));
        assert_eq!(parsed.unit, "g");
        assert_eq!(parsed.description, "butter");
    }

    #[test]
    fn test_parse_multi_word_unit() {
        let parsed = parse_ingredient_line("8 fl oz cream");
        assert_eq!(parsed.amount, Some(8.0));
        assert_eq!(parsed.unit, "fl oz");
        assert_eq!(parsed.description, "cream");
    }

    #[test]
    fn test_parse_unit_with_trailing_period() {
        let parsed = parse_ingredient_line("1 tbsp. olive oil");
        assert_eq!(parsed.unit, "tbsp");
        assert_eq!(parsed.description, "olive oil");
    }

    #[test]
    fn test_parse_number_without_unit() {
        let parsed = parse_ingredient_line("1 onion, diced");
        assert_eq!(parsed.amount, Some(1.0));
        assert_eq!(parsed.unit, "whole");
        assert_eq!(parsed.description, "onion, diced");

        let parsed = parse_ingredient_line("3 large eggs");
        assert_eq!(parsed.unit, "whole");
        assert_eq!(parsed.description, "large eggs");
    }

    #[test]
    fn test_parse_descriptive_line() {
        let parsed = parse_ingredient_line("  salt to taste ");
        assert_eq!(parsed.amount, None);
        assert_eq!(parsed.unit, "descriptive");
        assert_eq!(parsed.description, "salt to taste");
        assert_eq!(parsed.original_text, "  salt to taste ");
        assert!(parsed.is_descriptive());

        let parsed = parse_ingredient_line("a pinch");
        assert!(parsed.is_descriptive());
        assert_eq!(parsed.description, "a pinch");
    }

    #[test]
    fn test_parse_zero_denominator_falls_back_to_descriptive() {
        let parsed = parse_ingredient_line("1/0 cup sugar");
        assert_eq!(parsed.amount, None);
        assert_eq!(parsed.unit, "descriptive");
        assert_eq!(parsed.description, "1/0 cup sugar");

        let parsed = parse_ingredient_line("2 3/0 tsp salt");
        assert!(parsed.is_descriptive());
    }

    #[test]
    fn test_parse_mixed_number() {
        let parsed = parse_ingredient_line("1 1/2 cups milk");
        assert_eq!(parsed.amount, Some(1.5));
        assert_eq!(parsed.unit, "cups");
        assert_eq!(parsed.description, "milk");
    }

    #[test]
    fn test_parse_range_uses_midpoint() {
        let parsed = parse_ingredient_line("1-2 cups stock");
        assert_eq!(parsed.amount, Some(1.5));
        assert_eq!(parsed.unit, "cups");
        assert_eq!(parsed.description, "stock");

        let parsed = parse_ingredient_line("2 to 4 onions");
        assert_eq!(parsed.amount, Some(3.0));
        assert_eq!(parsed.unit, "whole");
        assert_eq!(parsed.description, "onions");
    }

    #[test]
    fn test_parse_vulgar_fraction() {
        let parsed = parse_ingredient_line("½ cup sugar");
        assert_eq!(parsed.amount, Some(0.5));
        assert_eq!(parsed.unit, "cup");

        let parsed = parse_ingredient_line("2¼ cups flour");
        assert_eq!(parsed.amount, Some(2.25));
        assert_eq!(parsed.description, "flour");
    }

    #[test]
    fn test_parse_count_unit() {
        let parsed = parse_ingredient_line("3 cloves garlic, minced");
        assert_eq!(parsed.amount, Some(3.0));
        assert_eq!(parsed.unit, "cloves");
        assert_eq!(parsed.description, "garlic, minced");
    }

    #[test]
    fn test_parse_does_not_take_unit_prefix_of_word() {
        let parsed = parse_ingredient_line("2 garlic bulbs");
        assert_eq!(parsed.unit, "whole");
        assert_eq!(parsed.description, "garlic bulbs");

        let parsed = parse_ingredient_line("1 canned chipotle");
        assert_eq!(parsed.unit, "whole");
        assert_eq!(parsed.description, "canned chipotle");
    }

    #[test]
    fn test_parse_number_alone_is_descriptive() {
        let parsed = parse_ingredient_line("3");
        assert!(parsed.is_descriptive());
        assert_eq!(parsed.description, "3");
    }

    #[test]
    fn test_parse_quantity_without_ingredient_is_descriptive() {
        for line in ["1/2", "½", "2 cups", "3 oz", "1 1/2 tbsp", "1-2"] {
            let parsed = parse_ingredient_line(line);
            assert!(parsed.is_descriptive(), "{:?} should be descriptive", line);
            assert_eq!(parsed.amount, None);
            assert_eq!(parsed.description, line);
        }
    }

    #[test]
    fn test_parse_unrepresentable_amount_is_descriptive() {
        let line = format!("{} lb beef", "9".repeat(400));
        let parsed = parse_ingredient_line(&line);
        assert!(parsed.is_descriptive());
        assert_eq!(parsed.amount, None);
        assert_eq!(parsed.description, line);

        let parsed = parse_ingredient_line(&format!("{}½ cup milk", "9".repeat(400)));
        assert!(parsed.is_descriptive());
    }

    #[test]
    fn test_parse_empty_line() {
        let parsed = parse_ingredient_line("   ");
        assert!(parsed.is_descriptive());
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn test_custom_matcher_order() {
        let parser = IngredientLineParser::with_matchers(vec![Box::new(BareNumberMatcher)]);
        let parsed = parser.parse("2 cups flour");
        assert_eq!(parsed.unit, "whole");
        assert_eq!(parsed.description, "cups flour");
        assert_eq!(parser.matcher_names(), vec!["bare_number"]);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1/2"), Some(0.5));
        assert_eq!(parse_quantity("1 1/2"), Some(1.5));
        assert_eq!(parse_quantity("0.75"), Some(0.75));
        assert_eq!(parse_quantity("½"), Some(0.5));
        assert_eq!(parse_quantity("2-3"), Some(2.5));
        assert_eq!(parse_quantity("1/0"), None);
        assert_eq!(parse_quantity("some"), None);
        assert_eq!(parse_quantity(""), None);
    }

    #[test]
    fn test_parse_quantity_rejects_trailing_text() {
        assert_eq!(parse_quantity(" 2¼ "), Some(2.25));
        assert_eq!(parse_quantity("2 to 4"), Some(3.0));
        assert_eq!(parse_quantity("1/2 cup"), None);
        assert_eq!(parse_quantity("2 eggs"), None);
        assert_eq!(parse_quantity("2 3/0"), None);
        assert_eq!(parse_quantity(&"9".repeat(400)), None);
    }
}
