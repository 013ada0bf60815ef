use std::num::NonZeroUsize;

use nonzero_ext::nonzero;

use crate::indicator::{Indicator, close_prices};
use crate::model::{Candle, RsiPoint};

/// RSI (Relative Strength Index) using Wilder's smoothing method.
#[derive(Debug, Clone, Copy)]
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(nonzero!(14usize))
    }
}

impl Rsi {
    pub fn new(period: NonZeroUsize) -> Self {
        Self {
            period: period.get(),
        }
    }
}

impl Indicator for Rsi {
    type Point = RsiPoint;

    fn required_candles(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<RsiPoint> {
        if candles.len() < self.required_candles() {
            return Vec::new();
        }

        let prices = close_prices(candles);
        let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
        let period = self.period as f64;

        // Seed using simple average of first `period` gains/losses
        let mut avg_gain = deltas[..self.period]
            .iter()
            .map(|&d| d.max(0.0))
            .sum::<f64>()
            / period;
        let mut avg_loss = deltas[..self.period]
            .iter()
            .map(|&d| (-d).max(0.0))
            .sum::<f64>()
            / period;

        let mut results = Vec::with_capacity(candles.len() - self.period);
        results.push(RsiPoint {
            time: candles[self.period].time,
            value: rsi_value(avg_gain, avg_loss),
        });

        // Wilder smoothing for subsequent values
        for (offset, &delta) in deltas[self.period..].iter().enumerate() {
            avg_gain = (avg_gain * (period - 1.0) + delta.max(0.0)) / period;
            avg_loss = (avg_loss * (period - 1.0) + (-delta).max(0.0)) / period;
            results.push(RsiPoint {
                time: candles[self.period + 1 + offset].time,
                value: rsi_value(avg_gain, avg_loss),
            });
        }

        results
    }
}

/// `RS` is pinned to 100 when there are no losses, giving 100 − 100/101.
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 {
        100.0
    } else {
        avg_gain / avg_loss
    };
    100.0 - 100.0 / (1.0 + rs)
}
