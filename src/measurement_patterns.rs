//! # Measurement Patterns Module
//!
//! Regex patterns used by the ingredient line parser. The unit alternation is
//! generated from the unit taxonomy's alias table so the parser and the
//! classifier always agree on which phrases are units.
//!
//! ## Unit alternation
//!
//! ```text
//! Collect every unit phrase from the taxonomy
//! Remove duplicates
//! Sort by length (longest first) so "fl oz" wins over "oz" and "gal" over "g"
//! Escape regex special characters ("fl. oz" -> "fl\. oz")
//! Join with "|"
//! ```
//!
//! A unit must be followed by whitespace or the end of the line, so the `g`
//! alias never matches the start of "garlic" and `can` never matches "canned".

use crate::unit_taxonomy;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Decimal or integer amount: "2", "0.5", ".75"
pub const NUMBER_PATTERN: &str = r"\d+(?:\.\d+)?|\.\d+";

/// Unicode vulgar fraction characters
pub const VULGAR_FRACTIONS: &str = "½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞";

/// Build the alternation of all known unit phrases, longest first
pub fn build_unit_alternation() -> String {
    let unique_units: HashSet<&'static str> = unit_taxonomy::unit_phrases().collect();
    let mut sorted_units: Vec<&'static str> = unique_units.into_iter().collect();

    // Sort by length descending, then alphabetically for consistency
    sorted_units.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    sorted_units
        .into_iter()
        .map(|unit| regex::escape(unit).replace(' ', r"\s+"))
        .collect::<Vec<String>>()
        .join("|")
}

/// Optional unit group followed by a word boundary (whitespace or end of line)
fn optional_unit_group(units: &str) -> String {
    format!(r"(?:(?P<unit>{})\.?(?:\s+|$))?", units)
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Measurement pattern should be valid")
}

/// "1-2", "2 to 3"
fn range_quantity() -> String {
    format!(
        r"(?P<low>{num})\s*(?:-|–|—|to)\s*(?P<high>{num})",
        num = NUMBER_PATTERN
    )
}

/// "1 1/2"
const MIXED_QUANTITY: &str = r"(?P<whole>\d+)\s+(?P<num>\d+)\s*/\s*(?P<den>\d+)";

/// "1/2"
const FRACTION_QUANTITY: &str = r"(?P<num>\d+)\s*/\s*(?P<den>\d+)";

/// "½", "2¼"
fn vulgar_quantity() -> String {
    format!(
        r"(?P<whole>\d+)?\s*(?P<vulgar>[{fractions}])",
        fractions = VULGAR_FRACTIONS
    )
}

/// "0.5"
fn decimal_quantity() -> String {
    format!(r"(?P<amount>{num})", num = NUMBER_PATTERN)
}

/// Quantity, optional unit, then the rest of the line as the description
fn line_pattern(quantity: &str) -> String {
    format!(
        r"(?i)^{quantity}\s*{unit}(?P<description>.*)$",
        quantity = quantity,
        unit = optional_unit_group(&UNIT_ALTERNATION),
    )
}

/// The quantity alone, nothing before or after
fn quantity_only_pattern(quantity: &str) -> String {
    format!(r"(?i)^{}$", quantity)
}

lazy_static! {
    pub static ref UNIT_ALTERNATION: String = build_unit_alternation();

    /// "1-2 cups stock", "2 to 3 onions"
    pub static ref RANGE_REGEX: Regex = compile(&line_pattern(&range_quantity()));

    /// Any fraction whose denominator is zero: "1/0 cup", "2 3/00 tsp"
    pub static ref ZERO_DENOMINATOR_REGEX: Regex =
        compile(r"^\d+(?:\s+\d+)?\s*/\s*0+(?:\D|$)");

    /// "1 1/2 cups milk"
    pub static ref MIXED_NUMBER_REGEX: Regex = compile(&line_pattern(MIXED_QUANTITY));

    /// "1/2 lb ground beef"
    pub static ref FRACTION_REGEX: Regex = compile(&line_pattern(FRACTION_QUANTITY));

    /// "½ cup sugar", "2¼ cups flour"
    pub static ref VULGAR_FRACTION_REGEX: Regex = compile(&line_pattern(&vulgar_quantity()));

    /// "0.5 lb ground beef", "500g butter"
    pub static ref DECIMAL_WITH_UNIT_REGEX: Regex = compile(&format!(
        r"(?i)^{quantity}\s*(?P<unit>{units})\.?(?:\s+|$)(?P<description>.*)$",
        quantity = decimal_quantity(),
        units = UNIT_ALTERNATION.as_str(),
    ));

    /// "2 onions" (number with no recognizable unit)
    pub static ref BARE_NUMBER_REGEX: Regex = compile(&format!(
        r"^{quantity}\s+(?P<description>\S.*)$",
        quantity = decimal_quantity(),
    ));

    // Bare quantities, as found in the amount field of structured records
    pub static ref RANGE_QUANTITY_REGEX: Regex = compile(&quantity_only_pattern(&range_quantity()));
    pub static ref MIXED_QUANTITY_REGEX: Regex = compile(&quantity_only_pattern(MIXED_QUANTITY));
    pub static ref FRACTION_QUANTITY_REGEX: Regex =
        compile(&quantity_only_pattern(FRACTION_QUANTITY));
    pub static ref VULGAR_QUANTITY_REGEX: Regex =
        compile(&quantity_only_pattern(&vulgar_quantity()));
    pub static ref DECIMAL_QUANTITY_REGEX: Regex =
        compile(&quantity_only_pattern(&decimal_quantity()));
}

/// Value of a unicode vulgar fraction character
pub fn vulgar_fraction_value(c: char) -> Option<f64> {
    let value = match c {
        '½' => 1.0 / 2.0,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '¼' => 1.0 / 4.0,
        '¾' => 3.0 / 4.0,
        '⅕' => 1.0 / 5.0,
        '⅖' => 2.0 / 5.0,
        '⅗' => 3.0 / 5.0,
        '⅘' => 4.0 / 5.0,
        '⅙' => 1.0 / 6.0,
        '⅚' => 5.0 / 6.0,
        '⅛' => 1.0 / 8.0,
        '⅜' => 3.0 / 8.0,
        '⅝' => 5.0 / 8.0,
        '⅞' => 7.0 / 8.0,
        _ => return None,
    };
    Some(value)
}
