//! Push-based metrics reporter for Pumpscout
//!
//! Periodically outputs a metrics snapshot as structured JSON to stdout.

use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Metrics snapshot for JSON output
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub stream: StreamSnapshot,
}

#[derive(Debug, Serialize)]
pub struct StreamSnapshot {
    pub subscribed_symbols: u64,
    pub candles_processed: u64,
    pub notify_failures: u64,
}

pub struct MetricsReporter {
    metrics: Metrics,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(metrics: Metrics, interval_seconds: u64) -> Self {
        Self {
            metrics,
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Symbols: {} | Candles: {} | Uptime: {}s",
                        snapshot.stream.subscribed_symbols,
                        snapshot.stream.candles_processed,
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
        }
    }

    fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.metrics.uptime().as_secs();

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            stream: StreamSnapshot {
                subscribed_symbols: self.metrics.subscribed_symbols.get() as u64,
                candles_processed: self.metrics.candles_processed_total.get(),
                notify_failures: self.metrics.notify_failures_total.get(),
            },
        }
    }
}
