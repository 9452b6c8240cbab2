//! Observability configuration parsing from environment variables.
//!
//! This module handles loading the liveness endpoint and metrics reporter settings.

use std::env;

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub liveness_enabled: bool,
    pub liveness_port: u16,
    pub liveness_bind_address: String,
    pub reporter_enabled: bool,
    pub reporter_interval_secs: u64,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            liveness_enabled: true,
            liveness_port: 8080,
            liveness_bind_address: "0.0.0.0".to_string(),
            reporter_enabled: true,
            reporter_interval_secs: 60,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Self {
        Self {
            liveness_enabled: env::var("LIVENESS_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
            liveness_port: env::var("LIVENESS_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .unwrap_or(8080),
            liveness_bind_address: env::var("LIVENESS_BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            reporter_enabled: env::var("OBSERVABILITY_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
            reporter_interval_secs: env::var("OBSERVABILITY_INTERVAL")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .unwrap_or(60),
        }
    }

    pub fn liveness_addr(&self) -> String {
        format!("{}:{}", self.liveness_bind_address, self.liveness_port)
    }
}
