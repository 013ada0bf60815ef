use std::fmt;

use serde::{Deserialize, Serialize};

/// One OHLCV bar. `time` is seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaPoint {
    pub time: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub time: i64,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiPoint {
    pub time: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerPoint {
    pub time: i64,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KdjPoint {
    pub time: i64,
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

/// Qualitative trend category, ordered from most bearish to most bullish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendKind {
    StrongDown,
    Down,
    Sideways,
    Up,
    StrongUp,
}

impl TrendKind {
    /// Map an additive trend score onto its category.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 60 => Self::StrongUp,
            s if s >= 20 => Self::Up,
            s if s >= -20 => Self::Sideways,
            s if s >= -60 => Self::Down,
            _ => Self::StrongDown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrongDown => "strong_down",
            Self::Down => "down",
            Self::Sideways => "sideways",
            Self::Up => "up",
            Self::StrongUp => "strong_up",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StrongUp => "Strong uptrend",
            Self::Up => "Moderate uptrend",
            Self::Sideways => "Range-bound",
            Self::Down => "Moderate downtrend",
            Self::StrongDown => "Strong downtrend",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::StrongUp => "Multiple indicators agree on upside momentum; the trend is strong",
            Self::Up => "The overall bias is bullish, but watch for pullbacks",
            Self::Sideways => "Buyers and sellers are balanced; wait for a direction to emerge",
            Self::Down => "The overall bias is bearish; keep position sizes in check",
            Self::StrongDown => "Multiple indicators agree on downside momentum; stay cautious",
        }
    }

    pub fn is_bullish(self) -> bool {
        matches!(self, Self::Up | Self::StrongUp)
    }

    pub fn is_bearish(self) -> bool {
        matches!(self, Self::Down | Self::StrongDown)
    }
}

impl fmt::Display for TrendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: TrendKind,
    pub label: String,
    pub description: String,
    /// 0..=100, the magnitude of the trend score.
    pub confidence: u8,
    /// Rationale strings in evaluation order.
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a daily log-return volatility.
    pub fn from_volatility(volatility: f64) -> Self {
        if volatility > 0.04 {
            Self::High
        } else if volatility > 0.02 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub next_day_prediction: Direction,
    pub next_day_confidence: u8,
    #[serde(rename = "priceTarget7d")]
    pub price_target_7d: f64,
    #[serde(rename = "priceTarget30d")]
    pub price_target_30d: f64,
    pub support_level: f64,
    pub resistance_level: f64,
    pub risk_level: RiskLevel,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A discrete buy/sell marker. `price` is offset from the bar's low/high so it
/// plots just outside the candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPoint {
    pub time: i64,
    pub price: f64,
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub reason: String,
}

/// Round a monetary value to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_score_maps_to_exactly_one_trend() {
        for score in -200..=200 {
            let kind = TrendKind::from_score(score);
            let expected = if score >= 60 {
                TrendKind::StrongUp
            } else if score >= 20 {
                TrendKind::Up
            } else if score >= -20 {
                TrendKind::Sideways
            } else if score >= -60 {
                TrendKind::Down
            } else {
                TrendKind::StrongDown
            };
            assert_eq!(kind, expected, "score {score}");
        }
    }

    #[test]
    fn trend_boundaries_are_inclusive_from_above() {
        assert_eq!(TrendKind::from_score(60), TrendKind::StrongUp);
        assert_eq!(TrendKind::from_score(59), TrendKind::Up);
        assert_eq!(TrendKind::from_score(20), TrendKind::Up);
        assert_eq!(TrendKind::from_score(19), TrendKind::Sideways);
        assert_eq!(TrendKind::from_score(-20), TrendKind::Sideways);
        assert_eq!(TrendKind::from_score(-21), TrendKind::Down);
        assert_eq!(TrendKind::from_score(-60), TrendKind::Down);
        assert_eq!(TrendKind::from_score(-61), TrendKind::StrongDown);
    }

    #[test]
    fn trend_kinds_are_ordered() {
        assert!(TrendKind::StrongDown < TrendKind::Down);
        assert!(TrendKind::Down < TrendKind::Sideways);
        assert!(TrendKind::Sideways < TrendKind::Up);
        assert!(TrendKind::Up < TrendKind::StrongUp);
    }

    #[test]
    fn risk_level_thresholds() {
        assert_eq!(RiskLevel::from_volatility(0.05), RiskLevel::High);
        assert_eq!(RiskLevel::from_volatility(0.04), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_volatility(0.03), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_volatility(0.02), RiskLevel::Low);
        assert_eq!(RiskLevel::from_volatility(0.0), RiskLevel::Low);
    }

    #[test]
    fn round_cents_rounds_half_away_from_zero() {
        assert_eq!(round_cents(12.345_6), 12.35);
        assert_eq!(round_cents(12.344), 12.34);
        assert_eq!(round_cents(100.0), 100.0);
    }

    #[test]
    fn trend_kind_serializes_snake_case() {
        let json = serde_json::to_string(&TrendKind::StrongUp).unwrap();
        assert_eq!(json, "\"strong_up\"");
        let parsed: TrendKind = serde_json::from_str("\"strong_down\"").unwrap();
        assert_eq!(parsed, TrendKind::StrongDown);
    }

    #[test]
    fn prediction_serializes_with_camel_case_keys() {
        let prediction = PredictionResult {
            next_day_prediction: Direction::Up,
            next_day_confidence: 60,
            price_target_7d: 101.5,
            price_target_30d: 106.14,
            support_level: 95.0,
            resistance_level: 110.0,
            risk_level: RiskLevel::Low,
            summary: "ok".into(),
        };
        let value = serde_json::to_value(&prediction).unwrap();
        assert_eq!(value["nextDayPrediction"], "up");
        assert_eq!(value["priceTarget7d"], 101.5);
        assert_eq!(value["priceTarget30d"], 106.14);
        assert_eq!(value["riskLevel"], "low");
    }

    #[test]
    fn signal_point_kind_serializes_as_type() {
        let point = SignalPoint {
            time: 1,
            price: 9.98,
            kind: SignalKind::Buy,
            reason: "MACD golden cross".into(),
        };
        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(value["type"], "buy");
    }
}
