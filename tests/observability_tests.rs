//! # Observability Tests Module
//!
//! Tests for tracing initialization, span helpers, metrics recording and the
//! configuration that drives them.

#[cfg(test)]
mod tests {
    use kitchen_prep::aggregation::ShoppingListEngine;
    use kitchen_prep::config::{AppConfig, EngineConfig};
    use kitchen_prep::observability;
    use kitchen_prep::observability_config::{presets, ObservabilityConfig};
    use kitchen_prep::recipe_model::{OrderCounts, Recipe, RecipeBook};
    use kitchen_prep::unit_taxonomy::UnitCategory;
    use std::time::Duration;

    /// Test that metrics recording functions work without a recorder installed
    #[test]
    fn test_metrics_recording() {
        observability::record_aggregation_metrics(3, 1, Duration::from_millis(12));
        for category in UnitCategory::ALL {
            observability::record_ingredient_line(category);
        }
        observability::record_validation_failure("aggregate");
    }

    /// Test span creation for aggregation and formatting
    #[test]
    fn test_span_creation() {
        let aggregation = observability::aggregation_span("aggregate");
        let formatting = observability::formatting_span("format_shopping_list");

        let _entered = aggregation.enter();
        let _inner = formatting.enter();
    }

    /// Tracing can only be installed once per process; the second attempt must
    /// report an error instead of panicking
    #[test]
    fn test_tracing_initialization_is_repeatable_without_panic() {
        let config = ObservabilityConfig {
            log_format: Some("json".to_string()),
            ..presets::production()
        };

        let _ = observability::init_tracing_with_config(&config);
        let second = observability::init_tracing_with_config(&config);
        assert!(second.is_err());
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let config = ObservabilityConfig {
            log_level: "everything".to_string(),
            ..Default::default()
        };
        assert!(observability::init_tracing_with_config(&config).is_err());
    }

    #[test]
    fn test_engine_built_from_app_config() {
        let config = AppConfig {
            engine: EngineConfig {
                include_examples: false,
                ..EngineConfig::default()
            },
            observability: presets::minimal(),
        };

        let engine = ShoppingListEngine::from_app_config(&config).unwrap();
        assert!(!engine.config().include_examples);

        let mut book = RecipeBook::new();
        book.insert("r", Recipe::new("R").with_component("main", ["2 eggs"]));
        let sections = engine.build_shopping_list(&book, &OrderCounts::new().with("r", 1));
        assert_eq!(sections[0].items[0].display, "2.0 eggs");
        assert!(sections[0].items[0].examples.is_empty());
    }

    #[test]
    fn test_invalid_app_config_is_rejected() {
        let config = AppConfig {
            engine: EngineConfig {
                max_order_count: 0,
                ..EngineConfig::default()
            },
            observability: ObservabilityConfig::default(),
        };
        assert!(ShoppingListEngine::from_app_config(&config).is_err());
    }
}
