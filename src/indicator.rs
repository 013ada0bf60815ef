pub mod bollinger;
pub mod kdj;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod volume;

use crate::model::Candle;

/// A technical analysis indicator that operates on a slice of candles.
///
/// Candles must be in ascending chronological order (oldest first). A series
/// shorter than the warm-up period yields fewer points (possibly none); this is
/// never an error.
pub trait Indicator: Send + Sync {
    type Point;

    /// Minimum number of candles required to produce at least one point.
    fn required_candles(&self) -> usize;

    /// Calculate one point per eligible candle, each tagged with that candle's time.
    fn calculate(&self, candles: &[Candle]) -> Vec<Self::Point>;
}

/// Extract close prices from a slice of candles.
pub fn close_prices(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Extract volumes from a slice of candles.
pub fn volumes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.volume).collect()
}

/// Trailing simple average over `period` values, computed with a running sum.
///
/// Returns `values.len() - period + 1` averages, or none when `values` is shorter.
pub(crate) fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let mut sum: f64 = values[..period].iter().sum();
    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(sum / period as f64);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out.push(sum / period as f64);
    }
    out
}
