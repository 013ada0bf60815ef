use std::collections::{HashMap, HashSet};

use crate::indicator::Indicator;
use crate::indicator::bollinger::BollingerBands;
use crate::indicator::macd::Macd;
use crate::indicator::rsi::Rsi;
use crate::model::{BollingerPoint, Candle, MacdPoint, RsiPoint, SignalKind, SignalPoint};

/// Minimum series length before any signal is extracted.
pub const MIN_SIGNAL_CANDLES: usize = 30;

pub const REASON_SEPARATOR: &str = " · ";

const OVERSOLD: f64 = 30.0;
const OVERBOUGHT: f64 = 70.0;
const BUY_OFFSET: f64 = 0.998;
const SELL_OFFSET: f64 = 1.002;

/// Buy/sell markers from MACD histogram sign flips and RSI threshold crossings
/// (up through 30, down through 70), sorted by time.
pub fn calc_signal_points(candles: &[Candle]) -> Vec<SignalPoint> {
    if candles.len() < MIN_SIGNAL_CANDLES {
        return Vec::new();
    }

    let rsi = Rsi::default().calculate(candles);
    let macd = Macd::default().calculate(candles);
    let bollinger = BollingerBands::default().calculate(candles);
    signals_from_indicators(candles, &rsi, &macd, &bollinger)
}

/// Run both detection passes over precomputed indicator series.
///
/// The MACD pass runs first; an RSI crossing is dropped when a signal already
/// exists at its timestamp.
pub fn signals_from_indicators(
    candles: &[Candle],
    rsi: &[RsiPoint],
    macd: &[MacdPoint],
    bollinger: &[BollingerPoint],
) -> Vec<SignalPoint> {
    let candle_by_time: HashMap<i64, &Candle> = candles.iter().map(|c| (c.time, c)).collect();
    let rsi_by_time: HashMap<i64, f64> = rsi.iter().map(|p| (p.time, p.value)).collect();
    let band_by_time: HashMap<i64, &BollingerPoint> =
        bollinger.iter().map(|p| (p.time, p)).collect();

    let mut signals = Vec::new();
    let mut taken: HashSet<i64> = HashSet::new();

    for pair in macd.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let Some(candle) = candle_by_time.get(&curr.time) else {
            continue;
        };
        let rsi_value = rsi_by_time.get(&curr.time).copied().unwrap_or(50.0);
        let band = band_by_time.get(&curr.time);

        if prev.histogram < 0.0 && curr.histogram > 0.0 {
            let mut reasons = vec!["MACD golden cross".to_string()];
            if rsi_value < 50.0 {
                reasons.push(format!("RSI {rsi_value:.0}"));
            }
            if band.is_some_and(|b| candle.close < b.middle) {
                reasons.push("below Bollinger mid".to_string());
            }
            taken.insert(curr.time);
            signals.push(buy(candle, reasons.join(REASON_SEPARATOR)));
        }

        if prev.histogram > 0.0 && curr.histogram < 0.0 {
            let mut reasons = vec!["MACD death cross".to_string()];
            if rsi_value > 50.0 {
                reasons.push(format!("RSI {rsi_value:.0}"));
            }
            if band.is_some_and(|b| candle.close > b.middle) {
                reasons.push("above Bollinger mid".to_string());
            }
            taken.insert(curr.time);
            signals.push(sell(candle, reasons.join(REASON_SEPARATOR)));
        }
    }

    for pair in rsi.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let Some(candle) = candle_by_time.get(&curr.time) else {
            continue;
        };

        // recovery out of the oversold zone buys, a drop out of overbought sells
        if prev.value < OVERSOLD && curr.value >= OVERSOLD && taken.insert(curr.time) {
            signals.push(buy(candle, format!("RSI oversold({:.0})", curr.value)));
        }
        if prev.value > OVERBOUGHT && curr.value <= OVERBOUGHT && taken.insert(curr.time) {
            signals.push(sell(candle, format!("RSI overbought({:.0})", curr.value)));
        }
    }

    signals.sort_by_key(|s| s.time);
    tracing::trace!(count = signals.len(), "signal points extracted");
    signals
}

fn buy(candle: &Candle, reason: String) -> SignalPoint {
    SignalPoint {
        time: candle.time,
        price: candle.low * BUY_OFFSET,
        kind: SignalKind::Buy,
        reason,
    }
}

fn sell(candle: &Candle, reason: String) -> SignalPoint {
    SignalPoint {
        time: candle.time,
        price: candle.high * SELL_OFFSET,
        kind: SignalKind::Sell,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::test_support::candles_from_closes;

    fn macd_point(time: i64, histogram: f64) -> MacdPoint {
        MacdPoint {
            time,
            macd: 0.0,
            signal: 0.0,
            histogram,
        }
    }

    fn rsi_point(time: i64, value: f64) -> RsiPoint {
        RsiPoint { time, value }
    }

    /// Down, up, down, up legs so both passes have crossings to find.
    fn zigzag() -> Vec<Candle> {
        let mut closes = Vec::new();
        let mut price = 100.0;
        for leg in 0..6 {
            let step = if leg % 2 == 0 { -1.5 } else { 1.5 };
            for _ in 0..25 {
                price += step;
                closes.push(price);
            }
        }
        let mut candles = candles_from_closes(&closes);
        for c in &mut candles {
            c.high = c.close + 1.0;
            c.low = c.close - 1.0;
        }
        candles
    }

    #[test]
    fn short_series_has_no_signals() {
        assert!(calc_signal_points(&zigzag()[..29]).is_empty());
    }

    #[test]
    fn histogram_flip_up_emits_single_buy() {
        let mut candles = candles_from_closes(&[100.0; 30]);
        candles[29].low = 95.0;
        let macd = [
            macd_point(candles[28].time, -0.5),
            macd_point(candles[29].time, 0.3),
        ];

        let signals = signals_from_indicators(&candles, &[], &macd, &[]);
        assert_eq!(signals.len(), 1);
        let signal = &signals[0];
        assert_eq!(signal.kind, SignalKind::Buy);
        assert_eq!(signal.time, candles[29].time);
        assert_eq!(signal.price, 95.0 * 0.998);
        assert_eq!(signal.reason, "MACD golden cross");
    }

    #[test]
    fn histogram_flip_down_emits_sell_with_qualifiers() {
        let mut candles = candles_from_closes(&[100.0; 3]);
        candles[2].high = 110.0;
        let t = candles[2].time;
        let macd = [macd_point(candles[1].time, 0.2), macd_point(t, -0.1)];
        let rsi = [rsi_point(t, 64.4)];
        let bands = [BollingerPoint {
            time: t,
            upper: 105.0,
            middle: 99.0,
            lower: 93.0,
        }];

        let signals = signals_from_indicators(&candles, &rsi, &macd, &bands);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::Sell);
        assert_eq!(signals[0].price, 110.0 * 1.002);
        assert_eq!(signals[0].reason, "MACD death cross · RSI 64 · above Bollinger mid");
    }

    #[test]
    fn zero_histogram_is_not_a_cross() {
        let candles = candles_from_closes(&[100.0; 3]);
        let macd = [
            macd_point(candles[0].time, -0.5),
            macd_point(candles[1].time, 0.0),
            macd_point(candles[2].time, 0.5),
        ];
        assert!(signals_from_indicators(&candles, &[], &macd, &[]).is_empty());
    }

    #[test]
    fn rsi_crossing_loses_tie_to_macd() {
        let candles = candles_from_closes(&[100.0; 3]);
        let t = candles[2].time;
        let macd = [macd_point(candles[1].time, -1.0), macd_point(t, 1.0)];
        let rsi = [rsi_point(candles[1].time, 28.0), rsi_point(t, 31.0)];

        let signals = signals_from_indicators(&candles, &rsi, &macd, &[]);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].reason, "MACD golden cross · RSI 31");
    }

    #[test]
    fn rsi_recovering_through_30_buys_and_falling_through_70_sells() {
        let candles = candles_from_closes(&[100.0; 4]);
        let rsi = [
            rsi_point(candles[0].time, 25.0),
            rsi_point(candles[1].time, 31.0),
            rsi_point(candles[2].time, 75.0),
            rsi_point(candles[3].time, 69.0),
        ];

        let signals = signals_from_indicators(&candles, &rsi, &[], &[]);
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].kind, SignalKind::Buy);
        assert_eq!(signals[0].time, candles[1].time);
        assert_eq!(signals[0].reason, "RSI oversold(31)");
        assert_eq!(signals[0].price, 100.0 * 0.998);
        assert_eq!(signals[1].kind, SignalKind::Sell);
        assert_eq!(signals[1].time, candles[3].time);
        assert_eq!(signals[1].reason, "RSI overbought(69)");
    }

    #[test]
    fn rsi_entering_extreme_zones_is_silent() {
        let candles = candles_from_closes(&[100.0; 4]);
        let rsi = [
            rsi_point(candles[0].time, 35.0),
            rsi_point(candles[1].time, 29.6),
            rsi_point(candles[2].time, 65.0),
            rsi_point(candles[3].time, 71.2),
        ];
        assert!(signals_from_indicators(&candles, &rsi, &[], &[]).is_empty());
    }

    #[test]
    fn rsi_exactly_at_threshold_counts_as_crossed() {
        let candles = candles_from_closes(&[100.0; 3]);
        let up = [rsi_point(candles[0].time, 29.9), rsi_point(candles[1].time, 30.0)];
        let down = [rsi_point(candles[1].time, 70.1), rsi_point(candles[2].time, 70.0)];
        assert_eq!(signals_from_indicators(&candles, &up, &[], &[])[0].kind, SignalKind::Buy);
        assert_eq!(signals_from_indicators(&candles, &down, &[], &[])[0].kind, SignalKind::Sell);
    }

    #[test]
    fn merged_output_is_sorted_by_time() {
        let candles = candles_from_closes(&[100.0; 4]);
        // RSI pass finds the earlier event after the MACD pass found the later one
        let macd = [
            macd_point(candles[2].time, -1.0),
            macd_point(candles[3].time, 1.0),
        ];
        let rsi = [rsi_point(candles[0].time, 75.0), rsi_point(candles[1].time, 65.0)];

        let signals = signals_from_indicators(&candles, &rsi, &macd, &[]);
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].time, candles[1].time);
        assert_eq!(signals[1].time, candles[3].time);
    }

    #[test]
    fn zigzag_produces_sorted_signals_with_unique_macd_times() {
        let signals = calc_signal_points(&zigzag());
        assert!(!signals.is_empty());
        assert!(signals.windows(2).all(|w| w[0].time <= w[1].time));

        let macd_times: Vec<i64> = signals
            .iter()
            .filter(|s| s.reason.starts_with("MACD"))
            .map(|s| s.time)
            .collect();
        let unique: HashSet<i64> = macd_times.iter().copied().collect();
        assert_eq!(unique.len(), macd_times.len());
        assert!(signals.iter().any(|s| s.kind == SignalKind::Buy));
        assert!(signals.iter().any(|s| s.kind == SignalKind::Sell));
    }

    #[test]
    fn signal_prices_sit_outside_the_bar() {
        let candles = zigzag();
        let by_time: HashMap<i64, &Candle> = candles.iter().map(|c| (c.time, c)).collect();
        for s in calc_signal_points(&candles) {
            let bar = by_time[&s.time];
            match s.kind {
                SignalKind::Buy => assert_eq!(s.price, bar.low * 0.998),
                SignalKind::Sell => assert_eq!(s.price, bar.high * 1.002),
            }
        }
    }
}
