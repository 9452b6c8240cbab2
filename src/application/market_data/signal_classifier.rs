//! Signal classification for confirmed candles.
//!
//! A candle passes when all four gates hold for its symbol's category:
//! 1. change fraction >= category minimum
//! 2. turnover >= category minimum
//! 3. the symbol's volatility estimate is warmed up
//! 4. change fraction >= ATR estimate * category multiplier
//!
//! Gate 4 compares a relative change with an ATR expressed in absolute price
//! units. The comparison is kept literal so signals match the deployed bot.

use crate::domain::market::symbol_category::{SymbolCategory, ThresholdProfile};
use crate::domain::trading::types::{CandleEvent, SignalEvent};
use chrono::{DateTime, Utc};

/// Outcome of evaluating one candle, naming the first gate that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    BelowMinChange,
    BelowMinTurnover,
    WarmingUp,
    BelowAtrBand,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignalClassifier;

impl SignalClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the gates for an already-computed change fraction.
    // Negated comparisons so NaN inputs fail their gate
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn evaluate(
        &self,
        profile: &ThresholdProfile,
        change_fraction: f64,
        turnover: f64,
        ready: bool,
        atr_estimate: f64,
    ) -> Verdict {
        if !(change_fraction >= profile.min_change_fraction) {
            Verdict::BelowMinChange
        } else if !(turnover >= profile.min_turnover) {
            Verdict::BelowMinTurnover
        } else if !ready {
            Verdict::WarmingUp
        } else if !(change_fraction >= atr_estimate * profile.atr_multiplier) {
            Verdict::BelowAtrBand
        } else {
            Verdict::Pass
        }
    }

    /// Classify a candle, building the signal event on pass.
    pub fn classify(
        &self,
        candle: &CandleEvent,
        atr_estimate: f64,
        ready: bool,
        now: DateTime<Utc>,
    ) -> (Verdict, Option<SignalEvent>) {
        let category = SymbolCategory::classify(&candle.symbol);
        let change_fraction = candle.change_fraction();
        let verdict = self.evaluate(
            &category.profile(),
            change_fraction,
            candle.turnover,
            ready,
            atr_estimate,
        );

        let signal = verdict.is_pass().then(|| SignalEvent {
            symbol: candle.symbol.clone(),
            change_fraction,
            close_price: candle.close,
            turnover: candle.turnover,
            timestamp: now,
        });

        (verdict, signal)
    }
}
