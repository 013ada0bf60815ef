pub mod json;
pub mod terminal;

use nonzero_ext::nonzero;
use serde::Serialize;

use crate::context::{MarketContext, Quote};
use crate::indicator::Indicator;
use crate::indicator::bollinger::BollingerBands;
use crate::indicator::kdj::Kdj;
use crate::indicator::ma::{Ema, Sma};
use crate::indicator::macd::Macd;
use crate::indicator::rsi::Rsi;
use crate::indicator::volume::VolumeMa;
use crate::model::{
    BollingerPoint, Candle, KdjPoint, MacdPoint, PredictionResult, SignalPoint, TrendAnalysis,
};
use crate::prediction::generate_prediction;
use crate::signal::calc_signal_points;
use crate::trend::analyze_trend;

/// Sink for a finished analysis.
pub trait Reporter: Send + Sync {
    fn report(&self, report: &AnalysisReport);
}

/// Latest value of each indicator; `None` while still warming up.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub ma5: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub ema12: Option<f64>,
    pub rsi14: Option<f64>,
    pub macd: Option<MacdPoint>,
    pub bollinger: Option<BollingerPoint>,
    pub kdj: Option<KdjPoint>,
    pub volume_ma20: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn latest(candles: &[Candle]) -> Self {
        Self {
            ma5: Sma::new(nonzero!(5usize)).calculate(candles).last().map(|p| p.value),
            ma20: Sma::new(nonzero!(20usize)).calculate(candles).last().map(|p| p.value),
            ma60: Sma::new(nonzero!(60usize)).calculate(candles).last().map(|p| p.value),
            ema12: Ema::new(nonzero!(12usize)).calculate(candles).last().map(|p| p.value),
            rsi14: Rsi::default().calculate(candles).last().map(|p| p.value),
            macd: Macd::default().calculate(candles).last().copied(),
            bollinger: BollingerBands::default().calculate(candles).last().copied(),
            kdj: Kdj::default().calculate(candles).last().copied(),
            volume_ma20: VolumeMa::new(nonzero!(20usize))
                .calculate(candles)
                .last()
                .map(|p| p.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub candles: usize,
    pub indicators: IndicatorSnapshot,
    pub trend: TrendAnalysis,
    pub prediction: PredictionResult,
    pub signals: Vec<SignalPoint>,
    pub context: MarketContext,
}

/// Run every analysis over `candles`.
pub fn analyze(candles: &[Candle], quote: &Quote, draw: &mut dyn FnMut() -> f64) -> AnalysisReport {
    let trend = analyze_trend(candles);
    let prediction = generate_prediction(candles, draw);
    let signals = calc_signal_points(candles);
    let context = MarketContext::build(candles, &trend, &prediction, quote);

    AnalysisReport {
        symbol: quote.symbol.clone(),
        candles: candles.len(),
        indicators: IndicatorSnapshot::latest(candles),
        trend,
        prediction,
        signals,
        context,
    }
}
