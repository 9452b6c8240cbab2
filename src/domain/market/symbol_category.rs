//! Symbol categories and their static threshold profiles.
//!
//! Every USDT-quoted symbol falls into exactly one category. Precedence:
//! major pair > top alt > mid alt > low alt (the default).

use serde::Serialize;
use std::fmt;

const MAJOR_PAIRS: &[&str] = &["BTCUSDT", "ETHUSDT"];

const TOP_ALTS: &[&str] = &[
    "SOLUSDT", "BNBUSDT", "XRPUSDT", "TONUSDT", "ADAUSDT", "DOGEUSDT", "TRXUSDT", "LINKUSDT",
];

const MID_ALTS: &[&str] = &[
    "ATOMUSDT",
    "AVAXUSDT",
    "LTCUSDT",
    "MATICUSDT",
    "DOTUSDT",
    "ALGOUSDT",
    "FILUSDT",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolCategory {
    MajorPair,
    TopAlt,
    MidAlt,
    LowAlt,
}

impl SymbolCategory {
    pub const ALL: [SymbolCategory; 4] = [
        SymbolCategory::MajorPair,
        SymbolCategory::TopAlt,
        SymbolCategory::MidAlt,
        SymbolCategory::LowAlt,
    ];

    /// Classify a symbol from the static membership tables.
    pub fn classify(symbol: &str) -> Self {
        if MAJOR_PAIRS.contains(&symbol) {
            SymbolCategory::MajorPair
        } else if TOP_ALTS.contains(&symbol) {
            SymbolCategory::TopAlt
        } else if MID_ALTS.contains(&symbol) {
            SymbolCategory::MidAlt
        } else {
            SymbolCategory::LowAlt
        }
    }

    pub fn profile(self) -> ThresholdProfile {
        match self {
            SymbolCategory::MajorPair => ThresholdProfile {
                min_change_fraction: 0.004,
                min_turnover: 1_000_000.0,
                atr_multiplier: 1.2,
            },
            SymbolCategory::TopAlt => ThresholdProfile {
                min_change_fraction: 0.005,
                min_turnover: 300_000.0,
                atr_multiplier: 1.5,
            },
            SymbolCategory::MidAlt => ThresholdProfile {
                min_change_fraction: 0.008,
                min_turnover: 100_000.0,
                atr_multiplier: 2.0,
            },
            SymbolCategory::LowAlt => ThresholdProfile {
                min_change_fraction: 0.015,
                min_turnover: 50_000.0,
                atr_multiplier: 2.5,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SymbolCategory::MajorPair => "major_pair",
            SymbolCategory::TopAlt => "top_alt",
            SymbolCategory::MidAlt => "mid_alt",
            SymbolCategory::LowAlt => "low_alt",
        }
    }
}

impl fmt::Display for SymbolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-category minimums and ATR scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdProfile {
    pub min_change_fraction: f64,
    pub min_turnover: f64,
    pub atr_multiplier: f64,
}
