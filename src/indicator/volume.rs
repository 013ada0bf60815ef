use std::num::NonZeroUsize;

use crate::indicator::ma::tag_with_time;
use crate::indicator::{Indicator, rolling_mean, volumes};
use crate::model::{Candle, MaPoint};

/// Volume Moving Average: simple average of trading volume over a period.
#[derive(Debug, Clone, Copy)]
pub struct VolumeMa {
    period: usize,
}

impl VolumeMa {
    pub fn new(period: NonZeroUsize) -> Self {
        Self {
            period: period.get(),
        }
    }
}

impl Indicator for VolumeMa {
    type Point = MaPoint;

    fn required_candles(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> Vec<MaPoint> {
        tag_with_time(candles, self.period, rolling_mean(&volumes(candles), self.period))
    }
}
