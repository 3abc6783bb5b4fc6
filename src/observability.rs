//! Observability module for tracing and metrics setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Span helpers for aggregation runs
//! - Metrics recording through the `metrics` facade
//!
//! The library never installs a metrics exporter. Without a recorder the
//! metrics macros are no-ops; an embedding service installs its own.

use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::prelude::*;

use crate::observability_config::ObservabilityConfig;
use crate::unit_taxonomy::UnitCategory;

/// Initialize structured logging with tracing and configuration.
///
/// Returns an error instead of panicking when a global subscriber is
/// already installed.
pub fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("kitchen_prep={}", config.log_level).parse()?);

    if config.use_pretty_logs() {
        // Pretty formatting for development
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()?;
    } else {
        // JSON formatting for production (default)
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Create a span for aggregation operations
pub fn aggregation_span(operation: &str) -> tracing::Span {
    tracing::info_span!(
        "aggregation_operation",
        operation = operation,
        component = "aggregation"
    )
}

/// Create a span for shopping-list formatting
pub fn formatting_span(operation: &str) -> tracing::Span {
    tracing::info_span!(
        "formatting_operation",
        operation = operation,
        component = "shopping_list"
    )
}

/// Record metrics for one aggregation run
pub fn record_aggregation_metrics(
    recipes_included: usize,
    descriptive_fallbacks: usize,
    duration: Duration,
) {
    metrics::counter!("aggregation_runs_total").increment(1);
    metrics::counter!("aggregation_recipes_total").increment(recipes_included as u64);
    metrics::counter!("descriptive_fallbacks_total").increment(descriptive_fallbacks as u64);
    metrics::histogram!("aggregation_duration_seconds").record(duration.as_secs_f64());
}

/// Record one processed ingredient line under its category
pub fn record_ingredient_line(category: UnitCategory) {
    metrics::counter!("ingredient_lines_total", "category" => category.as_str()).increment(1);
}

/// Record a rejected aggregation request
pub fn record_validation_failure(operation: &str) {
    let operation = operation.to_string();
    metrics::counter!("validation_failures_total", "operation" => operation).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_is_rejected_before_install() {
        let config = ObservabilityConfig {
            log_level: "chatty".to_string(),
            ..Default::default()
        };
        let err = init_tracing_with_config(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid observability configuration"));
    }

    #[test]
    fn test_metrics_without_recorder_are_noops() {
        record_aggregation_metrics(2, 1, Duration::from_millis(3));
        record_ingredient_line(UnitCategory::Weight);
        record_validation_failure("aggregate_json");
    }

    #[test]
    fn test_spans_can_be_entered() {
        let span = aggregation_span("aggregate");
        let _guard = span.enter();
        let inner = formatting_span("format");
        let _inner_guard = inner.enter();
    }
}
