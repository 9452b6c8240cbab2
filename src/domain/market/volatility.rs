//! Per-symbol ATR-style volatility estimate.
//!
//! The estimate is an exponential moving average of the simplified true range
//! (`|high - low|`). The first sample seeds the average directly; afterwards
//! `ema = alpha * tr + (1 - alpha) * ema` with `alpha = 2 / (period + 1)`.

use std::collections::HashMap;

/// Rolling volatility state for a single symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityState {
    ema: Option<f64>,
    alpha: f64,
    period: usize,
    sample_count: usize,
}

impl VolatilityState {
    pub fn new(period: usize) -> Self {
        Self {
            ema: None,
            alpha: 2.0 / (period as f64 + 1.0),
            period,
            sample_count: 0,
        }
    }

    /// Fold one true-range sample into the estimate and return it.
    ///
    /// `None` leaves the state untouched and returns the last estimate, or 0.0
    /// before the first sample.
    pub fn update(&mut self, true_range: Option<f64>) -> f64 {
        let Some(tr) = true_range else {
            return self.ema.unwrap_or(0.0);
        };

        let ema = match self.ema {
            None => tr,
            Some(prev) => self.alpha * tr + (1.0 - self.alpha) * prev,
        };
        self.ema = Some(ema);
        self.sample_count = (self.sample_count + 1).min(self.period);
        ema
    }

    /// Warm-up gate: at least `max(3, period / 3)` samples seen.
    pub fn is_ready(&self) -> bool {
        self.sample_count >= Self::warmup_samples(self.period)
    }

    pub fn warmup_samples(period: usize) -> usize {
        (period / 3).max(3)
    }

    pub fn ema(&self) -> Option<f64> {
        self.ema
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }
}

/// Owned map of volatility states, created lazily per symbol.
#[derive(Debug, Clone)]
pub struct VolatilityTracker {
    period: usize,
    states: HashMap<String, VolatilityState>,
}

impl VolatilityTracker {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            states: HashMap::new(),
        }
    }

    pub fn update(&mut self, symbol: &str, true_range: Option<f64>) -> f64 {
        self.state_mut(symbol).update(true_range)
    }

    pub fn is_ready(&self, symbol: &str) -> bool {
        self.states.get(symbol).is_some_and(VolatilityState::is_ready)
    }

    pub fn get(&self, symbol: &str) -> Option<&VolatilityState> {
        self.states.get(symbol)
    }

    fn state_mut(&mut self, symbol: &str) -> &mut VolatilityState {
        let period = self.period;
        self.states
            .entry(symbol.to_string())
            .or_insert_with(|| VolatilityState::new(period))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: usize = 15;

    #[test]
    fn test_first_sample_seeds_ema() {
        let mut state = VolatilityState::new(PERIOD);
        assert_eq!(state.update(Some(2.5)), 2.5);
        assert_eq!(state.ema(), Some(2.5));
        assert_eq!(state.sample_count(), 1);
    }

    #[test]
    fn test_ema_recurrence_matches_closed_form() {
        let samples = [1.0, 3.0, 2.0, 5.0, 4.0, 0.5];
        let alpha = 2.0 / (PERIOD as f64 + 1.0);
        let mut state = VolatilityState::new(PERIOD);

        let mut expected = samples[0];
        state.update(Some(samples[0]));
        for &tr in &samples[1..] {
            expected = alpha * tr + (1.0 - alpha) * expected;
            let got = state.update(Some(tr));
            assert!((got - expected).abs() < 1e-12, "got {got}, expected {expected}");
        }

        // Closed form: sum of weighted samples plus the decayed seed
        let n = samples.len() - 1;
        let mut closed = (1.0 - alpha).powi(n as i32) * samples[0];
        for (i, &tr) in samples[1..].iter().enumerate() {
            closed += alpha * (1.0 - alpha).powi((n - 1 - i) as i32) * tr;
        }
        assert!((state.ema().unwrap() - closed).abs() < 1e-12);
    }

    #[test]
    fn test_none_update_is_noop() {
        let mut state = VolatilityState::new(PERIOD);
        assert_eq!(state.update(None), 0.0);
        assert_eq!(state.ema(), None);
        assert_eq!(state.sample_count(), 0);

        state.update(Some(1.5));
        let before = state.clone();
        assert_eq!(state.update(None), 1.5);
        assert_eq!(state, before);
    }

    #[test]
    fn test_readiness_threshold() {
        // period 15 -> max(3, 5) = 5 samples
        let mut state = VolatilityState::new(PERIOD);
        for k in 1..=4 {
            state.update(Some(1.0));
            assert!(!state.is_ready(), "ready too early after {k} samples");
        }
        state.update(Some(1.0));
        assert!(state.is_ready());
    }

    #[test]
    fn test_short_period_uses_floor_of_three() {
        let mut state = VolatilityState::new(6);
        assert_eq!(VolatilityState::warmup_samples(6), 3);
        state.update(Some(1.0));
        state.update(Some(1.0));
        assert!(!state.is_ready());
        state.update(Some(1.0));
        assert!(state.is_ready());
    }

    #[test]
    fn test_sample_count_capped_at_period() {
        let mut state = VolatilityState::new(PERIOD);
        for _ in 0..(PERIOD * 3) {
            state.update(Some(1.0));
        }
        assert_eq!(state.sample_count(), PERIOD);
    }

    #[test]
    fn test_tracker_creates_states_lazily() {
        let mut tracker = VolatilityTracker::new(PERIOD);
        assert!(tracker.is_empty());
        assert!(!tracker.is_ready("BTCUSDT"));
        assert!(tracker.get("BTCUSDT").is_none());

        tracker.update("BTCUSDT", Some(2.0));
        tracker.update("ETHUSDT", Some(1.0));
        tracker.update("BTCUSDT", Some(4.0));

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.get("BTCUSDT").unwrap().sample_count(), 2);
        assert_eq!(tracker.get("ETHUSDT").unwrap().ema(), Some(1.0));
    }
}
