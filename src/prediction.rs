use rand::Rng;

use crate::indicator::Indicator;
use crate::indicator::bollinger::BollingerBands;
use crate::indicator::macd::Macd;
use crate::indicator::rsi::Rsi;
use crate::model::{Candle, Direction, PredictionResult, RiskLevel, TrendKind, round_cents};
use crate::trend::analyze_trend;

/// Minimum series length for a scored forecast.
pub const MIN_PREDICTION_CANDLES: usize = 30;

const SUPPORT_RESISTANCE_WINDOW: usize = 30;
const VOLATILITY_WINDOW: usize = 20;
/// Anchor price used when the series is empty.
const EMPTY_SERIES_ANCHOR: f64 = 100.0;

/// Forecast next-day direction, price targets and risk for a candle series.
///
/// `draw` must return independent uniform values in `[0, 1)`. It is called
/// three times per scored forecast: the direction perturbation, then the
/// 7-day jitter, then the 30-day jitter.
pub fn generate_prediction(candles: &[Candle], draw: &mut dyn FnMut() -> f64) -> PredictionResult {
    if candles.len() < MIN_PREDICTION_CANDLES {
        tracing::debug!(
            available = candles.len(),
            required = MIN_PREDICTION_CANDLES,
            "insufficient candles for prediction"
        );
        return insufficient_data(candles.last().map_or(EMPTY_SERIES_ANCHOR, |c| c.close));
    }

    let trend = analyze_trend(candles).trend;
    let last_close = candles[candles.len() - 1].close;
    let rsi = Rsi::default()
        .calculate(candles)
        .last()
        .map_or(50.0, |p| p.value);
    let histogram = Macd::default()
        .calculate(candles)
        .last()
        .map_or(0.0, |p| p.histogram);

    let recent = &candles[candles.len() - SUPPORT_RESISTANCE_WINDOW..];
    let support = recent.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let resistance = recent.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);

    let mut up_score = 0.0;
    if trend.is_bullish() {
        up_score += 40.0;
    }
    if trend.is_bearish() {
        up_score -= 40.0;
    }
    if rsi < 30.0 {
        up_score += 20.0;
    }
    if rsi > 70.0 {
        up_score -= 20.0;
    }
    if let Some(band) = BollingerBands::default().calculate(candles).last() {
        if last_close < band.lower {
            up_score += 15.0;
        }
        if last_close > band.upper {
            up_score -= 15.0;
        }
    }
    if histogram > 0.0 {
        up_score += 10.0;
    }
    if histogram < 0.0 {
        up_score -= 10.0;
    }

    // Market uncertainty, uniform in [-10, 10).
    up_score += (draw() - 0.5) * 20.0;

    let next_day_prediction = if up_score > 5.0 {
        Direction::Up
    } else if up_score < -5.0 {
        Direction::Down
    } else {
        Direction::Neutral
    };
    let next_day_confidence = direction_confidence(up_score);

    let volatility = historical_volatility(candles, VOLATILITY_WINDOW);
    let factor = trend_factor(trend);
    let target_7d = last_close * factor * (1.0 + (draw() - 0.5) * volatility * 0.5);
    let target_30d = last_close * factor.powi(4) * (1.0 + (draw() - 0.5) * volatility);

    PredictionResult {
        next_day_prediction,
        next_day_confidence,
        price_target_7d: round_cents(target_7d),
        price_target_30d: round_cents(target_30d),
        support_level: round_cents(support),
        resistance_level: round_cents(resistance),
        risk_level: RiskLevel::from_volatility(volatility),
        summary: summary(trend, rsi),
    }
}

/// [`generate_prediction`] with draws from the thread-local generator.
pub fn predict_with_thread_rng(candles: &[Candle]) -> PredictionResult {
    let mut rng = rand::thread_rng();
    generate_prediction(candles, &mut || rng.r#gen::<f64>())
}

/// Population standard deviation of log returns over the trailing `period`
/// bars, or over the whole series when it is shorter. Zero with fewer than two bars.
pub fn historical_volatility(candles: &[Candle], period: usize) -> f64 {
    let start = candles.len().saturating_sub(period + 1);
    let returns: Vec<f64> = candles[start..]
        .windows(2)
        .map(|w| (w[1].close / w[0].close).ln())
        .collect();
    if returns.is_empty() {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// `|score| + 40`, capped at 85 and rounded.
fn direction_confidence(up_score: f64) -> u8 {
    (up_score.abs() + 40.0).min(85.0).round() as u8
}

fn trend_factor(trend: TrendKind) -> f64 {
    match trend {
        TrendKind::StrongUp => 1.03,
        TrendKind::Up => 1.015,
        TrendKind::Sideways => 1.0,
        TrendKind::Down => 0.985,
        TrendKind::StrongDown => 0.97,
    }
}

fn summary(trend: TrendKind, rsi: f64) -> String {
    match trend {
        TrendKind::StrongUp => format!(
            "Technicals are strong with indicators aligned to the upside. RSI is at {rsi:.0} and \
             MACD confirms the bullish cross; consider buying on pullbacks."
        ),
        TrendKind::Up => format!(
            "The overall trend is constructive with moving averages stacked bullishly. RSI is at \
             {rsi:.0}; the advance may continue short term, but keep position sizes in check."
        ),
        TrendKind::Sideways => "The market is consolidating with buyers and sellers roughly \
             balanced. Wait for a clear direction before acting."
            .to_string(),
        TrendKind::Down => format!(
            "Technicals are weak with moving averages stacked bearishly. RSI is at {rsi:.0}; \
             trade cautiously and manage risk."
        ),
        TrendKind::StrongDown => "Technicals are clearly weak with indicators aligned to the \
             downside. Stay on the sidelines until the price stabilises."
            .to_string(),
    }
}

fn insufficient_data(anchor: f64) -> PredictionResult {
    PredictionResult {
        next_day_prediction: Direction::Neutral,
        next_day_confidence: 50,
        price_target_7d: round_cents(anchor),
        price_target_30d: round_cents(anchor),
        support_level: round_cents(anchor * 0.95),
        resistance_level: round_cents(anchor * 1.05),
        risk_level: RiskLevel::Medium,
        summary: "Not enough data to produce a meaningful forecast".to_string(),
    }
}
