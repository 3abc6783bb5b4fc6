//! # Observability Configuration
//!
//! Environment-specific configuration for logging and metrics.

use std::env;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["json", "pretty"];

/// Observability configuration for different environments
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Log level for the `kitchen_prep` target
    pub log_level: String,
    /// Explicit log format ("json" or "pretty"); `None` picks by environment
    pub log_format: Option<String>,
    /// Whether aggregation runs record metrics
    pub enable_metrics: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: None,
            enable_metrics: true,
        }
    }
}

impl ObservabilityConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("KITCHEN_PREP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").ok(),
            enable_metrics: match env::var("KITCHEN_PREP_ENABLE_METRICS") {
                Ok(value) => value.parse().unwrap_or_else(|_| {
                    tracing::warn!(
                        value = %value,
                        "KITCHEN_PREP_ENABLE_METRICS is not a boolean, keeping metrics enabled"
                    );
                    true
                }),
                Err(_) => true,
            },
        }
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Whether logs should use the human-readable formatter
    pub fn use_pretty_logs(&self) -> bool {
        match self.log_format.as_deref() {
            Some(format) => format == "pretty",
            None => self.is_development(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.environment.trim().is_empty() {
            return Err("Environment name cannot be empty".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(format!("Invalid log level: {}", self.log_level));
        }

        if let Some(format) = &self.log_format {
            if !LOG_FORMATS.contains(&format.as_str()) {
                return Err(format!("Invalid log format: {}", format));
            }
        }

        Ok(())
    }
}

/// Environment-specific configuration presets
pub mod presets {
    use super::ObservabilityConfig;

    /// Development configuration with verbose pretty logs
    pub fn development() -> ObservabilityConfig {
        ObservabilityConfig {
            environment: "development".to_string(),
            log_level: "debug".to_string(),
            ..Default::default()
        }
    }

    /// Staging configuration
    pub fn staging() -> ObservabilityConfig {
        ObservabilityConfig {
            environment: "staging".to_string(),
            log_level: "info".to_string(),
            ..Default::default()
        }
    }

    /// Production configuration with JSON logs
    pub fn production() -> ObservabilityConfig {
        ObservabilityConfig {
            environment: "production".to_string(),
            log_level: "warn".to_string(),
            ..Default::default()
        }
    }

    /// Minimal configuration for resource-constrained environments
    pub fn minimal() -> ObservabilityConfig {
        ObservabilityConfig {
            environment: "minimal".to_string(),
            log_level: "error".to_string(),
            enable_metrics: false,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, None);
        assert!(config.enable_metrics);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ObservabilityConfig::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Invalid log level
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        // Reset and test invalid log format
        config.log_level = "info".to_string();
        config.log_format = Some("xml".to_string());
        assert!(config.validate().is_err());

        // Reset and test empty environment
        config.log_format = Some("json".to_string());
        config.environment = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_presets() {
        let dev = presets::development();
        assert_eq!(dev.environment, "development");
        assert_eq!(dev.log_level, "debug");

        let prod = presets::production();
        assert_eq!(prod.environment, "production");
        assert_eq!(prod.log_level, "warn");

        let minimal = presets::minimal();
        assert_eq!(minimal.environment, "minimal");
        assert!(!minimal.enable_metrics);

        for preset in [dev, presets::staging(), prod, minimal] {
            assert!(preset.validate().is_ok());
        }
    }

    #[test]
    fn test_environment_detection() {
        let dev = presets::development();
        assert!(dev.is_development());
        assert!(!dev.is_production());

        let prod = presets::production();
        assert!(!prod.is_development());
        assert!(prod.is_production());
    }

    #[test]
    fn test_log_format_selection() {
        let mut config = presets::production();
        assert!(!config.use_pretty_logs());

        config.log_format = Some("pretty".to_string());
        assert!(config.use_pretty_logs());

        let mut dev = presets::development();
        assert!(dev.use_pretty_logs());
        dev.log_format = Some("json".to_string());
        assert!(!dev.use_pretty_logs());
    }
}
