use std::path::{Path, PathBuf};

use chrono::DateTime;
use clap::Parser;
use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stock_insight::config::{self, AppConfig};
use stock_insight::context::Quote;
use stock_insight::data;
use stock_insight::mock;
use stock_insight::model::Candle;
use stock_insight::report::json::JsonReporter;
use stock_insight::report::terminal::TerminalReporter;
use stock_insight::report::{Reporter, analyze};

#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display("configuration error")]
    Config,
    #[display("input data error")]
    Data,
}

#[derive(Parser)]
#[command(name = "stock-insight", about = "Technical indicators, trend and signal report for a stock")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "stock-insight.toml")]
    config: PathBuf,
    /// JSON candle file to analyze
    #[arg(short, long, conflicts_with = "mock")]
    input: Option<PathBuf>,
    /// Analyze a generated demo series for this symbol
    #[arg(short, long)]
    mock: Option<String>,
    /// Report format
    #[arg(short, long, value_parser = ["text", "json"])]
    format: Option<String>,
}

fn main() {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Report<AppError>> {
    let cli = Cli::parse();
    let mut config = config::load_or_default(&cli.config).change_context(AppError::Config)?;
    apply_overrides(&mut config, cli);
    config::validate(&config).change_context(AppError::Config)?;

    init_tracing(&config);

    let mut rng = rand::thread_rng();
    let source = &config.source;
    let candles = match (source.kind.as_str(), &source.path) {
        ("file", Some(path)) => load_file(path)?,
        _ => {
            let end_time = chrono::Utc::now().timestamp();
            info!(symbol = %source.symbol, bars = source.bars, "generating demo series");
            mock::generate(&source.symbol, source.bars, end_time, &mut rng)
        }
    };
    log_range(&source.symbol, &candles);

    let quote = Quote {
        symbol: source.symbol.clone(),
        currency: mock::currency_for(&source.symbol).to_string(),
        pe: source.pe,
        market_cap: source.market_cap,
    };
    let report = analyze(&candles, &quote, &mut || rng.r#gen::<f64>());

    let reporter: Box<dyn Reporter> = match config.output.format.as_str() {
        "json" => Box::new(JsonReporter),
        _ => Box::new(TerminalReporter),
    };
    reporter.report(&report);

    Ok(())
}

/// Command-line flags take precedence over the config file.
fn apply_overrides(config: &mut AppConfig, cli: Cli) {
    if let Some(path) = cli.input {
        config.source.kind = "file".into();
        config.source.path = Some(path);
    }
    if let Some(symbol) = cli.mock {
        config.source.kind = "mock".into();
        config.source.symbol = symbol;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
}

fn load_file(path: &Path) -> Result<Vec<Candle>, Report<AppError>> {
    data::load_candles(path).change_context(AppError::Data)
}

fn log_range(symbol: &str, candles: &[Candle]) {
    let date = |time: i64| {
        DateTime::from_timestamp(time, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| time.to_string())
    };
    if let (Some(first), Some(last)) = (candles.first(), candles.last()) {
        info!(
            symbol,
            count = candles.len(),
            from = %date(first.time),
            to = %date(last.time),
            "candles ready"
        );
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::new(&config.general.log_level);
    match config.general.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}
