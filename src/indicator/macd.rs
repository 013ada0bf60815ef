use std::num::NonZeroUsize;

use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::ma::smoothing;
use crate::indicator::{Indicator, close_prices};
use crate::model::{Candle, MacdPoint};

/// MACD: fast/slow EMA spread (`macd`), its EMA (`signal`) and a histogram
/// scaled ×2 by charting convention.
#[derive(Debug, Clone, Copy)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(
        fast_period: NonZeroUsize,
        slow_period: NonZeroUsize,
        signal_period: NonZeroUsize,
    ) -> Result<Self, Report<IndicatorError>> {
        if fast_period >= slow_period {
            bail!(IndicatorError::InvalidParameter {
                name: "fast_period must be < slow_period".into(),
            });
        }
        Ok(Self {
            fast_period: fast_period.get(),
            slow_period: slow_period.get(),
            signal_period: signal_period.get(),
        })
    }
}

impl Indicator for Macd {
    type Point = MacdPoint;

    fn required_candles(&self) -> usize {
        self.slow_period
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<MacdPoint> {
        if candles.len() < self.slow_period {
            return Vec::new();
        }

        let closes = close_prices(candles);
        let fast = padded_ema(&closes, self.fast_period);
        let slow = padded_ema(&closes, self.slow_period);
        let dif: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let dea = padded_ema(&dif, self.signal_period);

        candles
            .iter()
            .enumerate()
            .skip(self.slow_period - 1)
            .map(|(i, candle)| MacdPoint {
                time: candle.time,
                macd: dif[i],
                signal: dea[i],
                histogram: 2.0 * (dif[i] - dea[i]),
            })
            .collect()
    }
}

/// EMA aligned to the input: slots before `period - 1` are zero, the slot at
/// `period - 1` holds the SMA seed.
///
/// The zero slots feed into `dif` for the leading bars, so the signal line's
/// seed averages over them; the effect decays geometrically.
fn padded_ema(data: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![0.0; data.len()];
    if data.len() < period {
        return out;
    }

    let k = smoothing(period);
    out[period - 1] = data[..period].iter().sum::<f64>() / period as f64;
    for i in period..data.len() {
        out[i] = data[i] * k + out[i - 1] * (1.0 - k);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::test_support::{candles_from_closes, rising};
    use nonzero_ext::nonzero;

    #[test]
    fn macd_invalid_fast_ge_slow() {
        assert!(Macd::new(nonzero!(26usize), nonzero!(12usize), nonzero!(9usize)).is_err());
        assert!(Macd::new(nonzero!(12usize), nonzero!(12usize), nonzero!(9usize)).is_err());
    }

    #[test]
    fn macd_new_accepts_custom_periods() {
        let macd = Macd::new(nonzero!(5usize), nonzero!(10usize), nonzero!(4usize)).unwrap();
        assert_eq!(macd.required_candles(), 10);
        assert_eq!(macd.calculate(&rising(30, 1.0, 1.0)).len(), 21);
    }

    #[test]
    fn macd_insufficient_data_is_empty() {
        let macd = Macd::default();
        assert!(macd.calculate(&candles_from_closes(&[1.0; 25])).is_empty());
    }

    #[test]
    fn macd_length_is_n_minus_slow_plus_one() {
        let macd = Macd::default();
        for n in [26usize, 27, 60, 90] {
            let candles = candles_from_closes(&vec![10.0; n]);
            assert_eq!(macd.calculate(&candles).len(), n - 26 + 1);
        }
    }

    #[test]
    fn macd_first_point_is_at_slow_minus_one() {
        let candles = rising(40, 100.0, 1.0);
        let points = Macd::default().calculate(&candles);
        assert_eq!(points[0].time, candles[25].time);
        assert_eq!(points.last().map(|p| p.time), candles.last().map(|c| c.time));
    }

    #[test]
    fn macd_histogram_is_twice_the_spread() {
        let candles = rising(60, 50.0, 0.7);
        for p in Macd::default().calculate(&candles) {
            assert!((p.histogram - 2.0 * (p.macd - p.signal)).abs() < 1e-9);
        }
    }

    #[test]
    fn macd_line_is_zero_on_flat_prices() {
        let points = Macd::new(nonzero!(3usize), nonzero!(5usize), nonzero!(3usize))
            .unwrap()
            .calculate(&candles_from_closes(&[10.0; 12]));
        assert_eq!(points.len(), 8);
        for p in &points {
            assert!(p.macd.abs() < 1e-9, "expected 0 for flat prices, got {}", p.macd);
        }
    }

    #[test]
    fn macd_positive_in_steady_uptrend() {
        let points = Macd::default().calculate(&rising(120, 100.0, 1.0));
        let last = points.last().unwrap();
        assert!(last.macd > 0.0);
    }

    #[test]
    fn padded_ema_zero_fills_warm_up() {
        let ema = padded_ema(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(ema[0], 0.0);
        assert_eq!(ema[1], 0.0);
        assert!((ema[2] - 2.0).abs() < 1e-9);
        assert!((ema[3] - 3.0).abs() < 1e-9);
    }
}
