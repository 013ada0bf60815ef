use std::num::NonZeroUsize;

use crate::indicator::{Indicator, close_prices, rolling_mean};
use crate::model::{Candle, MaPoint};

/// Simple Moving Average of close.
#[derive(Debug, Clone, Copy)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: NonZeroUsize) -> Self {
        Self {
            period: period.get(),
        }
    }
}

impl Indicator for Sma {
    type Point = MaPoint;

    fn required_candles(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<MaPoint> {
        tag_with_time(candles, self.period, rolling_mean(&close_prices(candles), self.period))
    }
}

/// Exponential Moving Average of close, seeded with the SMA of the first `period` closes.
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: NonZeroUsize) -> Self {
        Self {
            period: period.get(),
        }
    }

    /// EMA values from a price slice, starting at index `period - 1`.
    pub fn calculate_prices(&self, prices: &[f64]) -> Vec<f64> {
        if prices.len() < self.period {
            return Vec::new();
        }

        let k = smoothing(self.period);
        let seed: f64 = prices[..self.period].iter().sum::<f64>() / self.period as f64;
        let mut ema = seed;
        let mut results = Vec::with_capacity(prices.len() - self.period + 1);
        results.push(ema);

        for &price in &prices[self.period..] {
            ema = price * k + ema * (1.0 - k);
            results.push(ema);
        }

        results
    }
}

impl Indicator for Ema {
    type Point = MaPoint;

    fn required_candles(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<MaPoint> {
        tag_with_time(
            candles,
            self.period,
            self.calculate_prices(&close_prices(candles)),
        )
    }
}

/// EMA smoothing constant `2 / (period + 1)`.
pub(crate) fn smoothing(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Attach candle times to a trailing-window series whose first value belongs to
/// index `period - 1`.
pub(crate) fn tag_with_time(candles: &[Candle], period: usize, values: Vec<f64>) -> Vec<MaPoint> {
    candles[period.saturating_sub(1).min(candles.len())..]
        .iter()
        .zip(values)
        .map(|(candle, value)| MaPoint {
            time: candle.time,
            value,
        })
        .collect()
}
