//! Market feed configuration parsing from environment variables.
//!
//! Endpoints of the Bybit public API and the pacing of the websocket session.

use std::env;

/// Bybit feed and session pacing configuration
#[derive(Debug, Clone)]
pub struct FeedEnvConfig {
    pub ws_url: String,
    pub rest_url: String,
    pub category: String,
    pub page_limit: u32,
    pub chunk_size: usize,
    pub subscribe_pacing_ms: u64,
    pub refresh_every_min: u64,
    pub reconnect_delay_secs: u64,
    pub ping_interval_secs: u64,
    pub kline_interval: String,
}

impl Default for FeedEnvConfig {
    fn default() -> Self {
        Self {
            ws_url: "wss://stream.bybit.com/v5/public/linear".to_string(),
            rest_url: "https://api.bybit.com".to_string(),
            category: "linear".to_string(),
            page_limit: 500,
            chunk_size: 10,
            subscribe_pacing_ms: 250,
            refresh_every_min: 30,
            reconnect_delay_secs: 5,
            ping_interval_secs: 20,
            kline_interval: "1".to_string(),
        }
    }
}

impl FeedEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ws_url: env::var("BYBIT_WS_URL").unwrap_or(defaults.ws_url),
            rest_url: env::var("BYBIT_REST_URL").unwrap_or(defaults.rest_url),
            category: env::var("BYBIT_CATEGORY").unwrap_or(defaults.category),
            page_limit: env::var("BYBIT_PAGE_LIMIT")
                .unwrap_or_else(|_| "500".to_string())
                .parse::<u32>()
                .unwrap_or(defaults.page_limit),
            chunk_size: env::var("SUBSCRIBE_CHUNK_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<usize>()
                .unwrap_or(defaults.chunk_size),
            subscribe_pacing_ms: env::var("SUBSCRIBE_PACING_MS")
                .unwrap_or_else(|_| "250".to_string())
                .parse::<u64>()
                .unwrap_or(defaults.subscribe_pacing_ms),
            refresh_every_min: env::var("REFRESH_SYMBOLS_EVERY_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .unwrap_or(defaults.refresh_every_min),
            reconnect_delay_secs: env::var("RECONNECT_DELAY_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<u64>()
                .unwrap_or(defaults.reconnect_delay_secs),
            ping_interval_secs: env::var("PING_INTERVAL_SECS")
                .unwrap_or_else(|_| "20".to_string())
                .parse::<u64>()
                .unwrap_or(defaults.ping_interval_secs),
            kline_interval: env::var("KLINE_INTERVAL").unwrap_or(defaults.kline_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_config_defaults() {
        let config = FeedEnvConfig::default();
        assert_eq!(config.ws_url, "wss://stream.bybit.com/v5/public/linear");
        assert_eq!(config.rest_url, "https://api.bybit.com");
        assert_eq!(config.page_limit, 500);
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.subscribe_pacing_ms, 250);
        assert_eq!(config.refresh_every_min, 30);
        assert_eq!(config.reconnect_delay_secs, 5);
        assert_eq!(config.ping_interval_secs, 20);
        assert_eq!(config.kline_interval, "1");
    }
}
