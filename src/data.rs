use std::path::Path;

use error_stack::{Report, ResultExt};

use crate::error::DataError;
use crate::model::Candle;

/// Load a candle series from a JSON array at `path`.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>, Report<DataError>> {
    let content = std::fs::read_to_string(path)
        .change_context(DataError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let candles = parse_candles(&content).attach_with(|| format!("path: {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = candles.len(), "candles loaded");
    Ok(candles)
}

/// Parse and check a JSON candle array: non-empty with strictly increasing times.
pub fn parse_candles(content: &str) -> Result<Vec<Candle>, Report<DataError>> {
    let candles: Vec<Candle> = serde_json::from_str(content).change_context(DataError::Parse {
        reason: "expected an array of {time, open, high, low, close, volume}".into(),
    })?;

    if candles.is_empty() {
        return Err(Report::new(DataError::Empty));
    }

    if let Some(index) = candles
        .windows(2)
        .position(|w| w[1].time <= w[0].time)
        .map(|i| i + 1)
    {
        return Err(Report::new(DataError::OutOfOrder {
            index,
            time: candles[index].time,
        }));
    }

    Ok(candles)
}
