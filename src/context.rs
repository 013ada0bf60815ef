//! Snapshot of engine output handed to the AI-assistant collaborator.

use std::fmt;

use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};

use crate::indicator::Indicator;
use crate::indicator::bollinger::BollingerBands;
use crate::indicator::macd::Macd;
use crate::indicator::rsi::Rsi;
use crate::indicator::volume::VolumeMa;
use crate::model::{Candle, Direction, PredictionResult, RiskLevel, TrendAnalysis, TrendKind};

/// Qualitative reading of the latest MACD point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdSignal {
    GoldenCrossUp,
    DeathCrossDown,
    MomentumStrengthening,
    MomentumWeakening,
    Neutral,
}

impl MacdSignal {
    pub fn classify(point: Option<(f64, f64)>) -> Self {
        match point {
            None => Self::Neutral,
            Some((macd, hist)) if macd > 0.0 && hist > 0.0 => Self::GoldenCrossUp,
            Some((macd, hist)) if macd < 0.0 && hist < 0.0 => Self::DeathCrossDown,
            Some((_, hist)) if hist > 0.0 => Self::MomentumStrengthening,
            Some(_) => Self::MomentumWeakening,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::GoldenCrossUp => "golden cross, momentum rising",
            Self::DeathCrossDown => "death cross, momentum falling",
            Self::MomentumStrengthening => "momentum strengthening",
            Self::MomentumWeakening => "momentum weakening",
            Self::Neutral => "neutral",
        }
    }
}

/// Where the current price sits relative to the latest Bollinger bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BollingerPosition {
    AboveUpper,
    BelowLower,
    UpperHalf,
    LowerHalf,
    NearMiddle,
}

impl BollingerPosition {
    pub fn description(self) -> &'static str {
        match self {
            Self::AboveUpper => "above upper band (overbought)",
            Self::BelowLower => "below lower band (oversold)",
            Self::UpperHalf => "between middle and upper band",
            Self::LowerHalf => "between lower and middle band",
            Self::NearMiddle => "near middle band",
        }
    }
}

/// Quote metadata that does not come from the candle series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub currency: String,
    pub pe: Option<f64>,
    pub market_cap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    pub symbol: String,
    pub currency: String,
    pub current_price: f64,
    pub change_percent: f64,
    pub trend: TrendKind,
    pub trend_label: String,
    pub rsi: f64,
    pub macd_signal: MacdSignal,
    pub bollinger_position: BollingerPosition,
    pub prediction: Direction,
    pub confidence: u8,
    #[serde(rename = "priceTarget7d")]
    pub price_target_7d: f64,
    #[serde(rename = "priceTarget30d")]
    pub price_target_30d: f64,
    pub support_level: f64,
    pub resistance_level: f64,
    pub risk_level: RiskLevel,
    pub volume: f64,
    pub avg_volume: f64,
    pub volume_ratio: Option<f64>,
    pub pe: Option<f64>,
    pub market_cap: Option<f64>,
}

impl MarketContext {
    pub fn build(
        candles: &[Candle],
        trend: &TrendAnalysis,
        prediction: &PredictionResult,
        quote: &Quote,
    ) -> Self {
        let last = candles.last();
        let current_price = last.map_or(0.0, |c| c.close);
        let change_percent = match candles {
            [.., prev, curr] if prev.close != 0.0 => (curr.close - prev.close) / prev.close * 100.0,
            _ => 0.0,
        };

        let rsi = Rsi::default()
            .calculate(candles)
            .last()
            .map_or(50.0, |p| p.value);
        let macd_signal = MacdSignal::classify(
            Macd::default()
                .calculate(candles)
                .last()
                .map(|p| (p.macd, p.histogram)),
        );
        let bollinger_position = BollingerBands::default()
            .calculate(candles)
            .last()
            .map_or(BollingerPosition::NearMiddle, |band| {
                if current_price > band.upper {
                    BollingerPosition::AboveUpper
                } else if current_price < band.lower {
                    BollingerPosition::BelowLower
                } else if current_price > band.middle {
                    BollingerPosition::UpperHalf
                } else {
                    BollingerPosition::LowerHalf
                }
            });

        let volume = last.map_or(0.0, |c| c.volume);
        let avg_volume = VolumeMa::new(nonzero!(20usize))
            .calculate(candles)
            .last()
            .map_or(volume, |p| p.value);
        let volume_ratio = (avg_volume > 0.0).then(|| volume / avg_volume);

        Self {
            symbol: quote.symbol.clone(),
            currency: quote.currency.clone(),
            current_price,
            change_percent,
            trend: trend.trend,
            trend_label: trend.label.clone(),
            rsi,
            macd_signal,
            bollinger_position,
            prediction: prediction.next_day_prediction,
            confidence: prediction.next_day_confidence,
            price_target_7d: prediction.price_target_7d,
            price_target_30d: prediction.price_target_30d,
            support_level: prediction.support_level,
            resistance_level: prediction.resistance_level,
            risk_level: prediction.risk_level,
            volume,
            avg_volume,
            volume_ratio,
            pe: quote.pe,
            market_cap: quote.market_cap,
        }
    }
}

impl fmt::Display for MarketContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cur = currency_sign(&self.currency);
        let sign = if self.change_percent > 0.0 { "+" } else { "" };
        writeln!(f, "symbol: {}", self.symbol)?;
        writeln!(f, "current price: {cur}{:.2}", self.current_price)?;
        writeln!(f, "change today: {sign}{:.2}%", self.change_percent)?;
        writeln!(f, "trend: {} ({})", self.trend_label, self.trend)?;
        writeln!(f, "RSI: {:.1} (>70 overbought, <30 oversold)", self.rsi)?;
        writeln!(f, "MACD: {}", self.macd_signal.description())?;
        writeln!(f, "Bollinger: {}", self.bollinger_position.description())?;
        writeln!(
            f,
            "next-day prediction: {} (confidence {}%)",
            self.prediction, self.confidence
        )?;
        writeln!(f, "7-day target: {cur}{:.2}", self.price_target_7d)?;
        writeln!(f, "30-day target: {cur}{:.2}", self.price_target_30d)?;
        writeln!(f, "support: {cur}{:.2}", self.support_level)?;
        writeln!(f, "resistance: {cur}{:.2}", self.resistance_level)?;
        writeln!(f, "risk level: {}", self.risk_level)?;
        match self.volume_ratio {
            Some(ratio) => writeln!(f, "volume / average volume: {ratio:.2}x")?,
            None => writeln!(f, "volume / average volume: N/A")?,
        }
        if let Some(pe) = self.pe {
            writeln!(f, "P/E: {pe}")?;
        }
        if let Some(cap) = self.market_cap {
            writeln!(f, "market cap: {cur}{:.2}B", cap / 1e9)?;
        }
        Ok(())
    }
}

fn currency_sign(currency: &str) -> &'static str {
    match currency {
        "CNY" => "¥",
        "USD" => "$",
        _ => "",
    }
}
