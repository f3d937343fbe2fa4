use crate::error::ConfigError;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub analysis: Analysis,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub logging: Logging,
}

/// Which instruments to compare, against what, and over which window.
#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    /// Every symbol to fetch, benchmark included (e.g. "GADGX", "^DJI").
    pub symbols: Vec<String>,
    /// The symbol every other one is compared with.
    pub benchmark: String,
    /// Number of days used both as the return lag and as the rolling span.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Annual return rate of a risk-free investment (0.01 is 1%).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// First day of the analysed range.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// Last day of the analysed range. Defaults to today.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Analysis {
    pub fn end_date_or_today(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Where price data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Provider {
    /// Download daily bars from Yahoo Finance.
    #[default]
    Yahoo,
    /// Read previously saved CSV snapshots.
    Snapshot,
}

/// Locations of inputs and outputs.
#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    #[serde(default)]
    pub provider: Provider,
    /// Directory holding one `<symbol>.csv` snapshot per instrument.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
    /// Directory receiving the result table and summaries.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            snapshot_dir: default_snapshot_dir(),
            output_dir: default_output_dir(),
            yahoo_base_url: default_yahoo_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    /// Default filter directive when `RUST_LOG` is not set (e.g. "info").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, logs are also written to daily-rotated files in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

impl Config {
    /// Checks the cross-field rules that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;

        if analysis.symbols.is_empty() {
            return Err(ConfigError::ValidationError(
                "analysis.symbols must list at least one symbol".to_string(),
            ));
        }
        if analysis.window == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.window must be at least 1".to_string(),
            ));
        }
        if !analysis.symbols.contains(&analysis.benchmark) {
            return Err(ConfigError::ValidationError(format!(
                "benchmark '{}' is not among analysis.symbols",
                analysis.benchmark
            )));
        }
        if !analysis.risk_free_rate.is_finite() {
            return Err(ConfigError::ValidationError(
                "analysis.risk_free_rate must be a finite number".to_string(),
            ));
        }
        let end_date = analysis.end_date_or_today();
        if analysis.start_date > end_date {
            return Err(ConfigError::ValidationError(format!(
                "start date {} is after end date {}",
                analysis.start_date, end_date
            )));
        }

        Ok(())
    }
}

fn default_window() -> usize {
    92
}

fn default_risk_free_rate() -> f64 {
    0.01
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default()
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("fund_details")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
