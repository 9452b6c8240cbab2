//! Pumpscout - Bybit USDT-perpetual pump monitor
//!
//! Streams 1-minute klines for every tradable USDT perpetual, tracks an
//! exponentially smoothed true range per symbol and notifies on candles whose
//! move clears the category thresholds and the volatility band.
//!
//! # Usage
//! ```sh
//! TG_TOKEN=... TG_CHAT_ID=... cargo run
//! ```
//!
//! # Environment Variables
//! - `TG_TOKEN` / `TG_CHAT_ID` - Telegram delivery; signals are only logged when unset
//! - `LIVENESS_ENABLED` - Serve the alive and `/metrics` routes (default: true)
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::{Context, Result};
use pumpscout::application::stream::StreamSessionManager;
use pumpscout::config::Config;
use pumpscout::domain::ports::SignalSink;
use pumpscout::infrastructure::bybit::{BybitFeedConnector, BybitUniverseProvider};
use pumpscout::infrastructure::notifier::{LogSink, TelegramNotifier};
use pumpscout::infrastructure::observability::{LivenessServer, Metrics, MetricsReporter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Pumpscout {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: ws={}, rest={}, interval={}, atr_period={}",
        config.feed.ws_url, config.feed.rest_url, config.feed.kline_interval, config.signal.atr_period
    );

    let metrics = Metrics::new().context("Failed to register metrics")?;

    if config.observability.liveness_enabled {
        let server = LivenessServer::new(metrics.clone());
        let addr = config.observability.liveness_addr();
        tokio::spawn(async move {
            if let Err(e) = server.serve(&addr).await {
                error!("Liveness endpoint stopped: {:#}", e);
            }
        });
    } else {
        info!("Liveness endpoint disabled.");
    }

    if config.observability.reporter_enabled {
        let interval = config.observability.reporter_interval_secs;
        let reporter = MetricsReporter::new(metrics.clone(), interval);
        tokio::spawn(async move {
            reporter.run().await;
        });
        info!("Metrics reporter started (interval: {}s)", interval);
    } else {
        info!("Metrics reporting disabled.");
    }

    let sink: Arc<dyn SignalSink> = match config.notifier.telegram_credentials() {
        Some((token, chat_id)) => {
            info!("Signals will be sent to Telegram chat {}", chat_id);
            Arc::new(TelegramNotifier::new(
                config.notifier.telegram_api_url.clone(),
                token.to_string(),
                chat_id.to_string(),
                Duration::from_secs(config.notifier.timeout_secs),
            ))
        }
        None => {
            warn!("TG_TOKEN or TG_CHAT_ID not set, signals will only be logged");
            Arc::new(LogSink)
        }
    };

    let universe = Arc::new(BybitUniverseProvider::new(
        config.feed.rest_url.clone(),
        config.feed.category.clone(),
        config.feed.page_limit,
    ));
    let connector = Arc::new(BybitFeedConnector::new(
        config.feed.ws_url.clone(),
        Duration::from_secs(config.feed.ping_interval_secs),
    ));

    let mut manager =
        StreamSessionManager::new(config.session_config(), connector, universe, sink, metrics);

    tokio::select! {
        _ = manager.run() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutdown signal received. Exiting...");
        }
    }

    Ok(())
}
