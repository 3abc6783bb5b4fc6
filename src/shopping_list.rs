//! # Shopping List Formatter
//!
//! Renders an [`AggregateStructure`] as display sections in a fixed order:
//! Weight, Volume, Count, then Other for descriptive mentions. Empty sections
//! are left out.
//!
//! ```text
//! Weight
//! - 2.00 lbs ground beef
//!
//! Volume
//! - 6.00 cups flour
//!
//! Other
//! - salt to taste
//! ```

use crate::aggregation::{AggregateStructure, Example};
use crate::errors::AppResult;
use crate::observability::formatting_span;
use crate::unit_taxonomy::{from_base, UnitCategory};
use serde::{Deserialize, Serialize};

/// One line of the shopping list with the mentions behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub display: String,
    #[serde(default)]
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListSection {
    pub title: String,
    pub items: Vec<DisplayItem>,
}

/// Format an aggregate into sections, keeping provenance examples
pub fn format_shopping_list(aggregate: &AggregateStructure) -> Vec<ShoppingListSection> {
    format_shopping_list_with(aggregate, true)
}

/// Format an aggregate into sections.
///
/// Quantified items are ordered by normalized description; descriptive items
/// alphabetically, ignoring case.
pub fn format_shopping_list_with(
    aggregate: &AggregateStructure,
    include_examples: bool,
) -> Vec<ShoppingListSection> {
    let span = formatting_span("format_shopping_list");
    let _guard = span.enter();

    let examples_for = |examples: &[Example]| {
        if include_examples {
            examples.to_vec()
        } else {
            Vec::new()
        }
    };

    let mut sections = Vec::new();

    for category in UnitCategory::ALL {
        let items: Vec<DisplayItem> = match aggregate.entries(category) {
            Some(entries) => entries
                .values()
                .map(|entry| DisplayItem {
                    display: format!(
                        "{} {}",
                        from_base(entry.base_amount, category),
                        entry.description
                    ),
                    examples: examples_for(&entry.examples),
                })
                .collect(),
            None => {
                let mut descriptive: Vec<_> = aggregate.descriptive.iter().collect();
                descriptive.sort_by(|a, b| {
                    a.description
                        .to_lowercase()
                        .cmp(&b.description.to_lowercase())
                        .then_with(|| a.description.cmp(&b.description))
                });
                descriptive
                    .into_iter()
                    .map(|entry| DisplayItem {
                        display: entry.description.clone(),
                        examples: examples_for(&entry.examples),
                    })
                    .collect()
            }
        };

        if !items.is_empty() {
            sections.push(ShoppingListSection {
                title: category.section_title().to_string(),
                items,
            });
        }
    }

    tracing::debug!(
        sections = sections.len(),
        items = sections.iter().map(|s| s.items.len()).sum::<usize>(),
        "Shopping list formatted"
    );
    sections
}

/// Plain-text export: each title followed by its items, sections separated
/// by a blank line
pub fn to_plain_text(sections: &[ShoppingListSection]) -> String {
    sections
        .iter()
        .map(|section| {
            let mut block = section.title.clone();
            for item in &section.items {
                block.push_str("\n- ");
                block.push_str(&item.display);
            }
            block
        })
        .collect::<Vec<String>>()
        .join("\n\n")
}

/// JSON export in the `[{ title, items: [{ display, examples }] }]` shape
pub fn to_json(sections: &[ShoppingListSection]) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(sections)?)
}
