//! Candle Processing Pipeline
//!
//! Every kline item of a data message passes through four stages, in order:
//! 1. **Parsing** - decode the item; unconfirmed or malformed items stop here
//! 2. **Validation** - reject non-positive prices
//! 3. **Volatility Update** - fold the true range into the symbol's ATR
//! 4. **Classification** - apply the category thresholds
//!
//! A rejected item never touches the tracker and never interrupts the rest of
//! the message.

use crate::application::market_data::signal_classifier::{SignalClassifier, Verdict};
use crate::application::stream::protocol::{KlineMessage, parse_candle};
use crate::domain::errors::CandleRejection;
use crate::domain::market::symbol_category::SymbolCategory;
use crate::domain::market::volatility::VolatilityTracker;
use crate::domain::trading::types::{CandleEvent, SignalEvent};
use crate::infrastructure::observability::Metrics;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

pub struct CandlePipeline {
    tracker: VolatilityTracker,
    classifier: SignalClassifier,
    metrics: Option<Metrics>,
}

impl CandlePipeline {
    pub fn new(atr_period: usize) -> Self {
        Self {
            tracker: VolatilityTracker::new(atr_period),
            classifier: SignalClassifier::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Process every item of a kline message in receipt order.
    pub fn process_message(&mut self, message: &KlineMessage, now: DateTime<Utc>) -> Vec<SignalEvent> {
        message
            .items
            .iter()
            .filter_map(|item| match self.process_item(&message.symbol, item, now) {
                Ok(signal) => signal,
                Err(rejection) => {
                    self.record_rejection(&message.symbol, &rejection);
                    None
                }
            })
            .collect()
    }

    /// Stage 1 then the rest of the pipeline for a raw item.
    pub fn process_item(
        &mut self,
        symbol: &str,
        item: &Value,
        now: DateTime<Utc>,
    ) -> Result<Option<SignalEvent>, CandleRejection> {
        let candle = parse_candle(symbol, item)?;
        self.process_candle(&candle, now)
    }

    /// Stages 2-4 for an already decoded candle.
    pub fn process_candle(
        &mut self,
        candle: &CandleEvent,
        now: DateTime<Utc>,
    ) -> Result<Option<SignalEvent>, CandleRejection> {
        if !candle.confirmed {
            return Err(CandleRejection::Unconfirmed);
        }
        candle.validate()?;

        let atr = self.tracker.update(&candle.symbol, Some(candle.true_range()));
        let ready = self.tracker.is_ready(&candle.symbol);

        let (verdict, signal) = self.classifier.classify(candle, atr, ready, now);

        if let Some(metrics) = &self.metrics {
            metrics.candles_processed_total.inc();
            if verdict == Verdict::Pass {
                metrics.inc_signals(SymbolCategory::classify(&candle.symbol).as_str());
            }
        }

        debug!(
            "{}: change={:.5} atr={:.6} ready={} -> {:?}",
            candle.symbol,
            candle.change_fraction(),
            atr,
            ready,
            verdict
        );

        Ok(signal)
    }

    pub fn tracker(&self) -> &VolatilityTracker {
        &self.tracker
    }

    fn record_rejection(&self, symbol: &str, rejection: &CandleRejection) {
        if *rejection != CandleRejection::Unconfirmed {
            debug!("Discarding candle for {}: {}", symbol, rejection);
        }
        if let Some(metrics) = &self.metrics {
            metrics.inc_discarded(rejection.label());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn confirmed(open: f64, high: f64, low: f64, close: f64, turnover: f64) -> Value {
        json!({
            "open": open.to_string(),
            "high": high.to_string(),
            "low": low.to_string(),
            "close": close.to_string(),
            "turnover": turnover.to_string(),
            "confirm": true,
        })
    }

    fn message(symbol: &str, items: Vec<Value>) -> KlineMessage {
        KlineMessage {
            symbol: symbol.to_string(),
            items,
        }
    }

    #[test]
    fn test_unconfirmed_items_do_not_touch_tracker() {
        let mut pipeline = CandlePipeline::new(15);
        let mut item = confirmed(100.0, 101.0, 99.0, 100.5, 1e6);
        item["confirm"] = json!(false);

        let signals = pipeline.process_message(&message("BTCUSDT", vec![item]), Utc::now());
        assert!(signals.is_empty());
        assert!(pipeline.tracker().get("BTCUSDT").is_none());
    }

    #[test]
    fn test_negative_low_dropped_without_mutation() {
        let mut pipeline = CandlePipeline::new(15);
        pipeline.process_message(
            &message("SOLUSDT", vec![confirmed(10.0, 10.2, 9.9, 10.1, 1e6)]),
            Utc::now(),
        );
        let before = pipeline.tracker().get("SOLUSDT").cloned();

        let result = pipeline.process_item("SOLUSDT", &confirmed(10.0, 10.2, -9.9, 10.1, 1e6), Utc::now());
        assert_eq!(result, Err(CandleRejection::NonPositivePrice));
        assert_eq!(pipeline.tracker().get("SOLUSDT").cloned(), before);
    }

    #[test]
    fn test_bad_item_does_not_stop_message() {
        let metrics = Metrics::new().unwrap();
        let mut pipeline = CandlePipeline::new(15).with_metrics(metrics.clone());
        let items = vec![
            confirmed(1.0, 1.1, 0.9, 1.0, 100.0),
            json!({"open": "x", "high": "1", "low": "1", "close": "1", "confirm": true}),
            confirmed(1.0, 1.2, 0.95, 1.1, 100.0),
        ];

        pipeline.process_message(&message("PEPEUSDT", items), Utc::now());

        assert_eq!(pipeline.tracker().get("PEPEUSDT").unwrap().sample_count(), 2);
        assert_eq!(metrics.candles_processed_total.get(), 2);
        assert_eq!(
            Metrics::counter_value(&metrics.candles_discarded_total, "non_numeric"),
            1.0
        );
    }

    #[test]
    fn test_no_signal_before_warmup() {
        let mut pipeline = CandlePipeline::new(15);
        // Tiny true range so only the warm-up gate can block the 5% moves
        for _ in 0..4 {
            let signals = pipeline.process_message(
                &message("PEPEUSDT", vec![confirmed(1.0, 1.0001, 1.0, 1.05, 1e6)]),
                Utc::now(),
            );
            assert!(signals.is_empty());
        }

        let signals = pipeline.process_message(
            &message("PEPEUSDT", vec![confirmed(1.0, 1.0001, 1.0, 1.05, 1e6)]),
            Utc::now(),
        );
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].symbol, "PEPEUSDT");
        assert!((signals[0].change_fraction - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_signal_counted_by_category() {
        let metrics = Metrics::new().unwrap();
        let mut pipeline = CandlePipeline::new(15).with_metrics(metrics.clone());
        for _ in 0..5 {
            pipeline.process_message(
                &message("DOGEUSDT", vec![confirmed(0.1, 0.10001, 0.1, 0.102, 500_000.0)]),
                Utc::now(),
            );
        }
        assert_eq!(Metrics::counter_value(&metrics.signals_total, "top_alt"), 1.0);
    }

    #[test]
    fn test_unconfirmed_candle_event_rejected() {
        let mut pipeline = CandlePipeline::new(15);
        let candle = CandleEvent {
            symbol: "BTCUSDT".to_string(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            turnover: 0.0,
            confirmed: false,
        };
        assert_eq!(
            pipeline.process_candle(&candle, Utc::now()),
            Err(CandleRejection::Unconfirmed)
        );
    }
}
