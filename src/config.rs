use std::path::{Path, PathBuf};

use error_stack::{Report, ResultExt};
use serde::Deserialize;

use crate::error::ConfigError;

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

fn default_source_kind() -> String {
    "mock".into()
}

fn default_symbol() -> String {
    "AAPL".into()
}

fn default_bars() -> usize {
    91
}

fn default_output_format() -> String {
    "text".into()
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// Accepted values: `"mock"` | `"file"`
    #[serde(default = "default_source_kind")]
    pub kind: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// JSON candle file, required when `kind = "file"`.
    pub path: Option<PathBuf>,
    /// Length of the generated mock series.
    #[serde(default = "default_bars")]
    pub bars: usize,
    pub pe: Option<f64>,
    pub market_cap: Option<f64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            symbol: default_symbol(),
            path: None,
            bars: default_bars(),
            pe: None,
            market_cap: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_output_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

/// Load and validate an `AppConfig` from a TOML file at `path`.
pub fn load(path: &Path) -> Result<AppConfig, Report<ConfigError>> {
    let content = std::fs::read_to_string(path)
        .change_context(ConfigError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content).change_context(ConfigError::Parse {
        reason: "invalid TOML syntax or schema mismatch".into(),
    })?;

    validate(&config)?;

    Ok(config)
}

/// Like [`load`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> Result<AppConfig, Report<ConfigError>> {
    if path.exists() {
        load(path)
    } else {
        Ok(AppConfig::default())
    }
}

const VALID_LOG_FORMATS: &[&str] = &["text", "json"];
const VALID_SOURCE_KINDS: &[&str] = &["mock", "file"];
const VALID_OUTPUT_FORMATS: &[&str] = &["text", "json"];

pub fn validate(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    validate_choice("general.log_format", &config.general.log_format, VALID_LOG_FORMATS)?;
    validate_choice("source.kind", &config.source.kind, VALID_SOURCE_KINDS)?;
    validate_choice("output.format", &config.output.format, VALID_OUTPUT_FORMATS)?;
    validate_source(&config.source)?;
    Ok(())
}

fn validate_choice(field: &str, value: &str, allowed: &[&str]) -> Result<(), Report<ConfigError>> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(Report::new(ConfigError::Validation {
        field: format!(
            "{field} \"{value}\" is not valid (expected one of: {})",
            allowed.join(", ")
        ),
    }))
}

fn validate_source(source: &SourceConfig) -> Result<(), Report<ConfigError>> {
    if source.kind == "file" && source.path.is_none() {
        return Err(Report::new(ConfigError::Validation {
            field: "source.path is required when source.kind is \"file\"".into(),
        }));
    }
    if source.bars == 0 {
        return Err(Report::new(ConfigError::Validation {
            field: "source.bars must be at least 1".into(),
        }));
    }
    Ok(())
}
