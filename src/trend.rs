use nonzero_ext::nonzero;

use crate::indicator::Indicator;
use crate::indicator::ma::Sma;
use crate::indicator::macd::Macd;
use crate::indicator::rsi::Rsi;
use crate::model::{Candle, TrendAnalysis, TrendKind};

/// Minimum series length for a scored verdict.
pub const MIN_TREND_CANDLES: usize = 60;

const MOMENTUM_LOOKBACK: usize = 20;

/// Classify the trend of a candle series with an additive heuristic score.
///
/// Rules run in a fixed order (MA alignment, price vs MA20, RSI band, MACD
/// state, 20-bar momentum) and each contributing rule appends its rationale.
pub fn analyze_trend(candles: &[Candle]) -> TrendAnalysis {
    if candles.len() < MIN_TREND_CANDLES {
        tracing::debug!(
            available = candles.len(),
            required = MIN_TREND_CANDLES,
            "insufficient candles for trend analysis"
        );
        return insufficient_data();
    }

    let ma5 = last_value(Sma::new(nonzero!(5usize)).calculate(candles).last().map(|p| p.value));
    let ma20 = last_value(Sma::new(nonzero!(20usize)).calculate(candles).last().map(|p| p.value));
    let ma60 = last_value(Sma::new(nonzero!(60usize)).calculate(candles).last().map(|p| p.value));
    let rsi = last_value(Rsi::default().calculate(candles).last().map(|p| p.value));
    let macd = Macd::default().calculate(candles);
    let (macd_line, histogram) = macd
        .last()
        .map(|p| (p.macd, p.histogram))
        .unwrap_or_default();

    let last_close = candles[candles.len() - 1].close;
    let mut signals = Vec::new();
    let mut score = 0i32;

    if ma5 > ma20 && ma20 > ma60 {
        score += 30;
        signals.push("Bullish MA alignment (MA5 > MA20 > MA60)".to_string());
    } else if ma5 < ma20 && ma20 < ma60 {
        score -= 30;
        signals.push("Bearish MA alignment (MA5 < MA20 < MA60)".to_string());
    }

    if last_close > ma20 {
        score += 15;
        signals.push("Price above the 20-day MA".to_string());
    } else {
        score -= 15;
        signals.push("Price below the 20-day MA".to_string());
    }

    if rsi > 60.0 {
        score += 15;
        signals.push(format!("RSI in strong zone ({rsi:.1})"));
    } else if rsi < 40.0 {
        score -= 15;
        signals.push(format!("RSI in weak zone ({rsi:.1})"));
    } else {
        signals.push(format!("Neutral RSI ({rsi:.1})"));
    }

    if macd_line > 0.0 && histogram > 0.0 {
        score += 20;
        signals.push("MACD above zero with rising momentum".to_string());
    } else if macd_line < 0.0 && histogram < 0.0 {
        score -= 20;
        signals.push("MACD below zero with falling momentum".to_string());
    }

    let base = candles[candles.len() - MOMENTUM_LOOKBACK].close;
    let change_pct = (last_close - base) / base * 100.0;
    if change_pct > 10.0 {
        score += 20;
        signals.push(format!("Up {change_pct:.1}% over the last 20 bars"));
    } else if change_pct < -10.0 {
        score -= 20;
        signals.push(format!("Down {:.1}% over the last 20 bars", change_pct.abs()));
    }

    let trend = TrendKind::from_score(score);
    tracing::trace!(score, trend = %trend, "trend scored");

    TrendAnalysis {
        trend,
        label: trend.label().to_string(),
        description: trend.description().to_string(),
        confidence: score.unsigned_abs().min(100) as u8,
        signals,
    }
}

fn insufficient_data() -> TrendAnalysis {
    TrendAnalysis {
        trend: TrendKind::Sideways,
        label: "Insufficient data".to_string(),
        description: "More price history is needed for a trend verdict".to_string(),
        confidence: 0,
        signals: Vec::new(),
    }
}

// Every indicator has at least one point once MIN_TREND_CANDLES is met.
fn last_value(value: Option<f64>) -> f64 {
    value.unwrap_or_default()
}
