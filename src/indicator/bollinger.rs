use std::num::NonZeroUsize;

use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::{Indicator, close_prices, rolling_mean};
use crate::model::{BollingerPoint, Candle};

/// Bollinger Bands: rolling mean ± `std_dev_multiplier` population standard deviations.
#[derive(Debug, Clone, Copy)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(
        period: NonZeroUsize,
        std_dev_multiplier: f64,
    ) -> Result<Self, Report<IndicatorError>> {
        if !std_dev_multiplier.is_finite() || std_dev_multiplier < 0.0 {
            bail!(IndicatorError::InvalidParameter {
                name: "std_dev_multiplier must be finite and >= 0".into(),
            });
        }
        Ok(Self {
            period: period.get(),
            std_dev_multiplier,
        })
    }
}

impl Indicator for BollingerBands {
    type Point = BollingerPoint;

    fn required_candles(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<BollingerPoint> {
        let prices = close_prices(candles);
        let means = rolling_mean(&prices, self.period);

        prices
            .windows(self.period)
            .zip(means)
            .zip(&candles[self.period.saturating_sub(1).min(candles.len())..])
            .map(|((window, middle), candle)| {
                let variance =
                    window.iter().map(|&p| (p - middle).powi(2)).sum::<f64>() / self.period as f64;
                let std_dev = variance.sqrt();
                BollingerPoint {
                    time: candle.time,
                    upper: middle + self.std_dev_multiplier * std_dev,
                    middle,
                    lower: middle - self.std_dev_multiplier * std_dev,
                }
            })
            .collect()
    }
}
