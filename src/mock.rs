//! Random-walk demo series for when no real price history is available.

use rand::Rng;

use crate::model::Candle;

const DAY_SECS: i64 = 86_400;

/// Shanghai (`.SS`) and Shenzhen (`.SZ`) listings.
pub fn is_mainland_symbol(symbol: &str) -> bool {
    symbol.ends_with(".SS") || symbol.ends_with(".SZ")
}

pub fn currency_for(symbol: &str) -> &'static str {
    if is_mainland_symbol(symbol) {
        "CNY"
    } else {
        "USD"
    }
}

/// Generate `bars` daily candles ending at `end_time`, oldest first.
///
/// Each bar drifts by `(u − 0.48) · price · 3%` with a floor at half the base
/// price, so the walk has a slight upward bias.
pub fn generate<R: Rng>(symbol: &str, bars: usize, end_time: i64, rng: &mut R) -> Vec<Candle> {
    let range = if is_mainland_symbol(symbol) { 400.0 } else { 300.0 };
    let base_price = 100.0 + rng.r#gen::<f64>() * range;
    let mut price = base_price;

    (0..bars)
        .rev()
        .map(|i| {
            let time = end_time - i as i64 * DAY_SECS;
            let change = (rng.r#gen::<f64>() - 0.48) * price * 0.03;
            let open = price;
            price = (price + change).max(base_price * 0.5);
            let high = open.max(price) * (1.0 + rng.r#gen::<f64>() * 0.01);
            let low = open.min(price) * (1.0 - rng.r#gen::<f64>() * 0.01);
            let volume = (1e6 + rng.r#gen::<f64>() * 5e7).floor();
            Candle {
                time,
                open,
                high,
                low,
                close: price,
                volume,
            }
        })
        .collect()
}
