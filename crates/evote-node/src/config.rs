//! # Node Configuration
//!
//! Program and telemetry settings for the node binary.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EVOTE_PROGRAM_ID` | `sha256("e_voting")` | Program id as 64 hex chars |
//! | `EVOTE_PRINT_METRICS` | `false` | Print Prometheus text after the report |
//!
//! Logging variables are read by `evote_telemetry::TelemetryConfig`.

use evote_program::errors::AddressError;
use evote_program::service::ServiceConfig;
use evote_telemetry::TelemetryConfig;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Voting service configuration.
    pub service: ServiceConfig,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
    /// Print Prometheus metrics after each run.
    pub print_metrics: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            telemetry: TelemetryConfig::for_service("evote-node"),
            print_metrics: false,
        }
    }
}

impl NodeConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            service: ServiceConfig::from_env()?,
            telemetry: TelemetryConfig::for_service("evote-node"),
            print_metrics: std::env::var("EVOTE_PRINT_METRICS")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
        })
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `EVOTE_PROGRAM_ID` is not a 32-byte hex string.
    #[error("invalid EVOTE_PROGRAM_ID: {0}")]
    InvalidProgramId(#[from] AddressError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_default_program() {
        let config = NodeConfig::default();
        assert_eq!(
            config.service.program_id,
            evote_program::domain::services::default_program_id()
        );
        assert_eq!(config.telemetry.service_name, "evote-node");
        assert!(!config.print_metrics);
    }

    #[test]
    fn test_error_names_variable() {
        let err = ConfigError::from(AddressError::InvalidLength(3));
        assert!(err.to_string().starts_with("invalid EVOTE_PROGRAM_ID"));
    }
}
