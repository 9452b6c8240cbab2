//! Signal configuration parsing from environment variables.

use std::env;

#[derive(Debug, Clone)]
pub struct SignalEnvConfig {
    pub atr_period: usize,
}

impl SignalEnvConfig {
    pub fn from_env() -> Self {
        Self {
            atr_period: env::var("ATR_PERIOD")
                .unwrap_or_else(|_| "15".to_string())
                .parse::<usize>()
                .unwrap_or(15),
        }
    }
}
