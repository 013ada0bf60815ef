use std::num::NonZeroUsize;

use nonzero_ext::nonzero;

use crate::indicator::Indicator;
use crate::model::{Candle, KdjPoint};

/// KDJ stochastic oscillator. K and D start at 50 and are smoothed with
/// weights 2/3 (previous) and 1/3 (new); `J = 3K − 2D`.
#[derive(Debug, Clone, Copy)]
pub struct Kdj {
    period: usize,
}

impl Default for Kdj {
    fn default() -> Self {
        Self::new(nonzero!(9usize))
    }
}

impl Kdj {
    pub fn new(period: NonZeroUsize) -> Self {
        Self {
            period: period.get(),
        }
    }
}

impl Indicator for Kdj {
    type Point = KdjPoint;

    fn required_candles(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<KdjPoint> {
        let mut k = 50.0;
        let mut d = 50.0;

        candles
            .windows(self.period)
            .map(|window| {
                let high_max = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
                let low_min = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
                let last = &window[window.len() - 1];

                let rsv = if high_max == low_min {
                    50.0
                } else {
                    (last.close - low_min) / (high_max - low_min) * 100.0
                };
                k = (2.0 / 3.0) * k + (1.0 / 3.0) * rsv;
                d = (2.0 / 3.0) * d + (1.0 / 3.0) * k;

                KdjPoint {
                    time: last.time,
                    k,
                    d,
                    j: 3.0 * k - 2.0 * d,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::test_support::{candles_from_closes, rising};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn kdj_length_and_times() {
        let candles = rising(30, 10.0, 1.0);
        let points = Kdj::default().calculate(&candles);
        assert_eq!(points.len(), 22);
        assert_eq!(points[0].time, candles[8].time);
        assert!(Kdj::default().calculate(&candles[..8]).is_empty());
    }

    #[test]
    fn kdj_flat_window_stays_at_50() {
        for p in Kdj::default().calculate(&candles_from_closes(&[7.0; 20])) {
            assert!((p.k - 50.0).abs() < 1e-9);
            assert!((p.d - 50.0).abs() < 1e-9);
            assert!((p.j - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn kdj_first_point_smooths_from_50() {
        // close at window high -> RSV 100 -> K = 50*2/3 + 100/3, D = 50*2/3 + K/3
        let points = Kdj::new(nonzero!(3usize)).calculate(&rising(3, 1.0, 1.0));
        let k = 50.0 * 2.0 / 3.0 + 100.0 / 3.0;
        let d = 50.0 * 2.0 / 3.0 + k / 3.0;
        assert!((points[0].k - k).abs() < 1e-9);
        assert!((points[0].d - d).abs() < 1e-9);
    }

    #[test]
    fn kdj_j_is_exactly_3k_minus_2d() {
        let mut rng = StdRng::seed_from_u64(3);
        let candles: Vec<Candle> = (0..300)
            .map(|i| {
                let close: f64 = rng.gen_range(90.0..110.0);
                Candle {
                    time: i,
                    open: close,
                    high: close + rng.gen_range(0.0..2.0),
                    low: close - rng.gen_range(0.0..2.0),
                    close,
                    volume: 1.0,
                }
            })
            .collect();
        for p in Kdj::default().calculate(&candles) {
            assert!(p.k.is_finite() && p.d.is_finite());
            assert_eq!(p.j, 3.0 * p.k - 2.0 * p.d);
            assert!((0.0..=100.0).contains(&p.k));
            assert!((0.0..=100.0).contains(&p.d));
        }
    }
}
