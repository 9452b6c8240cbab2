//! Configuration module for Pumpscout.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Feed, Signal, Notifier, and Observability.

mod feed_config;
mod notifier_config;
mod observability_config;
mod signal_config;

pub use feed_config::FeedEnvConfig;
pub use notifier_config::NotifierEnvConfig;
pub use observability_config::ObservabilityEnvConfig;
pub use signal_config::SignalEnvConfig;

use crate::application::stream::protocol::KlineTopics;
use crate::application::stream::session_manager::SessionConfig;
use anyhow::{Result, bail};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedEnvConfig,
    pub signal: SignalEnvConfig,
    pub notifier: NotifierEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unparseable numbers fall back to their defaults; settings that would
    /// stall the session are rejected.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            feed: FeedEnvConfig::from_env(),
            signal: SignalEnvConfig::from_env(),
            notifier: NotifierEnvConfig::from_env(),
            observability: ObservabilityEnvConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feed.chunk_size == 0 {
            bail!("SUBSCRIBE_CHUNK_SIZE must be at least 1");
        }
        if self.signal.atr_period == 0 {
            bail!("ATR_PERIOD must be at least 1");
        }
        if self.feed.ping_interval_secs == 0 {
            bail!("PING_INTERVAL_SECS must be at least 1");
        }
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            chunk_size: self.feed.chunk_size,
            subscribe_pacing: Duration::from_millis(self.feed.subscribe_pacing_ms),
            refresh_interval: Duration::from_secs(self.feed.refresh_every_min.saturating_mul(60)),
            reconnect_delay: Duration::from_secs(self.feed.reconnect_delay_secs),
            atr_period: self.signal.atr_period,
            topics: KlineTopics::new(&self.feed.kline_interval),
        }
    }
}
