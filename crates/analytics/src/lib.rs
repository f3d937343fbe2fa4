//! # Information Ratio Analytics
//!
//! This crate turns an aligned `TimeSeriesTable` of prices into rolling returns,
//! rolling Sharpe ratios and rolling information ratios against a benchmark.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no knowledge of data providers, files or the CLI. It depends only
//!   on `core-types` and `timeseries`.
//! - **Append-only tables:** every calculator reads existing columns, appends exactly one
//!   new column and returns its `ColumnKey`. Asking for a column that already exists
//!   returns the existing key.
//! - **No look-ahead:** windows only ever reach backwards, and undefined values are only
//!   ever filled from the past.
//!
//! ## Public API
//!
//! - `ReturnsCalculator`, `SharpeCalculator`, `InformationRatioCalculator`: the calculators.
//! - `AnalyticsEngine`: runs the bare and risk-adjusted passes for a list of instruments.
//! - `IrSummary`: the distribution of one information-ratio column, for reporting.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

pub mod engine;
pub mod error;
pub mod information_ratio;
pub mod report;
pub mod returns;
pub mod rolling;
pub mod sharpe;

pub use engine::{AnalyticsEngine, IrParameters, RunReport, SkippedComparison};
pub use error::AnalyticsError;
pub use information_ratio::InformationRatioCalculator;
pub use report::{Histogram, IrSummary, summarize};
pub use returns::ReturnsCalculator;
pub use sharpe::SharpeCalculator;
