//! # Unified Application Configuration
//!
//! This module gathers the engine limits and the observability settings into a
//! single configuration object. Values are loaded from `KITCHEN_PREP_*`
//! environment variables, fall back to defaults when unset, and are checked
//! by `validate()` before the engine is built.

use crate::errors::{error_logging, AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Limits and output options for the aggregation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Longest accepted ingredient line, in characters
    pub max_line_length: usize,
    /// Longest accepted recipe name, in characters
    pub max_recipe_name_length: usize,
    /// Highest accepted order multiplier for a single recipe
    pub max_order_count: u32,
    /// Whether shopping-list items carry their provenance examples
    pub include_examples: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_line_length: 500,
            max_recipe_name_length: 255,
            max_order_count: 1000,
            include_examples: true,
        }
    }
}

impl EngineConfig {
    /// Load engine configuration from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load engine configuration through a variable lookup function
    pub fn from_vars<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_line_length = lookup("KITCHEN_PREP_MAX_LINE_LENGTH")
            .unwrap_or_else(|| defaults.max_line_length.to_string())
            .trim()
            .parse()
            .map_err(|_| {
                AppError::Config("KITCHEN_PREP_MAX_LINE_LENGTH must be a valid number".to_string())
            })?;
        let max_recipe_name_length = lookup("KITCHEN_PREP_MAX_RECIPE_NAME_LENGTH")
            .unwrap_or_else(|| defaults.max_recipe_name_length.to_string())
            .trim()
            .parse()
            .map_err(|_| {
                AppError::Config(
                    "KITCHEN_PREP_MAX_RECIPE_NAME_LENGTH must be a valid number".to_string(),
                )
            })?;
        let max_order_count = lookup("KITCHEN_PREP_MAX_ORDER_COUNT")
            .unwrap_or_else(|| defaults.max_order_count.to_string())
            .trim()
            .parse()
            .map_err(|_| {
                AppError::Config("KITCHEN_PREP_MAX_ORDER_COUNT must be a valid number".to_string())
            })?;
        let include_examples = match lookup("KITCHEN_PREP_INCLUDE_EXAMPLES") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                AppError::Config(
                    "KITCHEN_PREP_INCLUDE_EXAMPLES must be 'true' or 'false'".to_string(),
                )
            })?,
            None => defaults.include_examples,
        };

        Ok(Self {
            max_line_length,
            max_recipe_name_length,
            max_order_count,
            include_examples,
        })
    }

    /// Validate engine configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.max_line_length == 0 {
            return Err(AppError::Config("Max line length cannot be 0".to_string()));
        }

        if self.max_line_length > 10_000 {
            return Err(AppError::Config(
                "Max line length cannot be greater than 10000 characters".to_string(),
            ));
        }

        if self.max_recipe_name_length == 0 {
            return Err(AppError::Config(
                "Max recipe name length cannot be 0".to_string(),
            ));
        }

        if self.max_order_count == 0 {
            return Err(AppError::Config("Max order count cannot be 0".to_string()));
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Aggregation engine configuration
    pub engine: EngineConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let engine = EngineConfig::from_env().inspect_err(|e| {
            error_logging::log_config_error(e, "KITCHEN_PREP_*", "load_engine_config");
        })?;

        Ok(Self {
            engine,
            observability: ObservabilityConfig::from_env(),
        })
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.engine.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: environment={}, log_level={}, max_line_length={}, max_recipe_name_length={}, max_order_count={}, include_examples={}, metrics_enabled={}",
            self.observability.environment,
            self.observability.log_level,
            self.engine.max_line_length,
            self.engine.max_recipe_name_length,
            self.engine.max_order_count,
            self.engine.include_examples,
            self.observability.enable_metrics
        )
    }
}
