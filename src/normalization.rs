//! # Description Normalization
//!
//! Canonicalizes free-text ingredient descriptions into grouping keys so that
//! "1 onion, diced" and "2 onions" land on the same shopping-list entry. The
//! key is only used for grouping; the first description seen is what the
//! shopping list displays.
//!
//! ## Steps (strictly in order)
//!
//! ```text
//! "Roma Tomatoes (ripe), halved"
//!   lower-case              "roma tomatoes (ripe), halved"
//!   truncate at comma       "roma tomatoes (ripe)"
//!   strip parentheticals    "roma tomatoes "
//!   strip prep suffix       "roma tomatoes "
//!   trim                    "roma tomatoes"
//!   singularize             "roma tomatoe"
//! ```
//!
//! Singularization is deliberately naive (`ies` -> `y`, otherwise a trailing
//! `s` is dropped). Irregular plurals are over- or under-merged; changing that
//! needs an agreed set of expected merges first.

use lazy_static::lazy_static;
use regex::Regex;

/// Preparation words removed when they end a description
pub const PREPARATION_WORDS: [&str; 11] = [
    "diced",
    "chopped",
    "sliced",
    "minced",
    "grated",
    "fresh",
    "frozen",
    "canned",
    "whole",
    "halved",
    "quartered",
];

lazy_static! {
    // An unclosed parenthesis runs to the end of the text
    static ref PARENTHETICAL_REGEX: Regex =
        Regex::new(r"\([^)]*(?:\)|$)").expect("Parenthetical pattern should be valid");
}

/// Grouping-key normalizer for ingredient descriptions
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptionNormalizer;

impl DescriptionNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Produce the grouping key for a description. Pure and total.
    pub fn normalize(&self, description: &str) -> String {
        let lowered = description.to_lowercase();
        let before_comma = truncate_at_comma(&lowered);
        let without_parens = PARENTHETICAL_REGEX.replace_all(before_comma, " ");
        let without_prep = strip_preparation_suffix(&without_parens);
        let trimmed = without_prep.split_whitespace().collect::<Vec<&str>>().join(" ");
        singularize(&trimmed)
    }
}

/// Normalize with the default normalizer
pub fn normalize_description(description: &str) -> String {
    DescriptionNormalizer.normalize(description)
}

fn truncate_at_comma(text: &str) -> &str {
    match text.find(',') {
        Some(index) => &text[..index],
        None => text,
    }
}

/// Drop trailing preparation words, keeping at least one word
fn strip_preparation_suffix(text: &str) -> String {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    while words.len() > 1 {
        match words.last() {
            Some(last) if PREPARATION_WORDS.contains(last) => {
                words.pop();
            }
            _ => break,
        }
    }
    words.join(" ")
}

fn singularize(text: &str) -> String {
    if let Some(stem) = text.strip_suffix("ies") {
        format!("{}y", stem)
    } else if let Some(stem) = text.strip_suffix('s') {
        stem.to_string()
    } else {
        text.to_string()
    }
}
