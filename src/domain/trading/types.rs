use crate::domain::errors::CandleRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One closed (or live-updating) 1-minute kline for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleEvent {
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub turnover: f64,
    pub confirmed: bool,
}

impl CandleEvent {
    /// Reject candles carrying any non-positive price.
    pub fn validate(&self) -> Result<(), CandleRejection> {
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 || self.close <= 0.0 {
            return Err(CandleRejection::NonPositivePrice);
        }
        Ok(())
    }

    /// Simplified true range: `|high - low|`, no reference to the prior close.
    pub fn true_range(&self) -> f64 {
        (self.high - self.low).abs()
    }

    /// Relative change from open to close.
    pub fn change_fraction(&self) -> f64 {
        (self.close - self.open) / self.open
    }
}

/// A candle that passed classification, handed to the notification sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub symbol: String,
    pub change_fraction: f64,
    pub close_price: f64,
    pub turnover: f64,
    pub timestamp: DateTime<Utc>,
}

impl SignalEvent {
    pub fn change_pct(&self) -> f64 {
        self.change_fraction * 100.0
    }

    /// Base asset with the USDT quote suffix removed (e.g. `SOLUSDT` -> `SOL`).
    pub fn base_asset(&self) -> &str {
        self.symbol.strip_suffix("USDT").unwrap_or(&self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> CandleEvent {
        CandleEvent {
            symbol: "BTCUSDT".to_string(),
            open,
            high,
            low,
            close,
            turnover: 1_000.0,
            confirmed: true,
        }
    }

    #[test]
    fn test_candle_metrics() {
        let c = candle(100.0, 102.0, 99.0, 105.0);
        assert!((c.true_range() - 3.0).abs() < 1e-12);
        assert!((c.change_fraction() - 0.05).abs() < 1e-12);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_non_positive_prices_rejected() {
        assert_eq!(
            candle(100.0, 102.0, -1.0, 101.0).validate(),
            Err(CandleRejection::NonPositivePrice)
        );
        assert_eq!(
            candle(0.0, 102.0, 99.0, 101.0).validate(),
            Err(CandleRejection::NonPositivePrice)
        );
    }

    #[test]
    fn test_signal_base_asset() {
        let signal = SignalEvent {
            symbol: "DOGEUSDT".to_string(),
            change_fraction: 0.021,
            close_price: 0.1,
            turnover: 60_000.0,
            timestamp: Utc::now(),
        };
        assert_eq!(signal.base_asset(), "DOGE");
        assert!((signal.change_pct() - 2.1).abs() < 1e-9);
    }
}
