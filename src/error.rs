use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("failed to read config file")]
    ReadFile,
    #[display("failed to parse config: {reason}")]
    Parse { reason: String },
    #[display("invalid config: {field}")]
    Validation { field: String },
}

#[derive(Debug, Display, Error)]
pub enum DataError {
    #[display("failed to read candle file")]
    ReadFile,
    #[display("failed to parse candles: {reason}")]
    Parse { reason: String },
    #[display("candle series is empty")]
    Empty,
    #[display("candle time {time} at index {index} is not after the previous candle")]
    OutOfOrder { index: usize, time: i64 },
}

#[derive(Debug, Display, Error)]
pub enum IndicatorError {
    #[display("invalid parameter: {name}")]
    InvalidParameter { name: String },
}
