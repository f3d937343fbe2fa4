use crate::information_ratio::InformationRatioCalculator;
use core_types::{ColumnKey, IrVariant};
use serde::Serialize;
use timeseries::TimeSeriesTable;

/// Parameters shared by every comparison of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct IrParameters {
    pub benchmark: String,
    pub window: usize,
    pub risk_free_rate: f64,
}

/// A comparison that could not be computed.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedComparison {
    pub investment: String,
    pub variant: IrVariant,
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub computed: Vec<ColumnKey>,
    pub skipped: Vec<SkippedComparison>,
}

/// Populates a table with the bare and risk-adjusted information ratios of every
/// instrument against one benchmark.
#[derive(Debug)]
pub struct AnalyticsEngine {
    params: IrParameters,
}

impl AnalyticsEngine {
    pub fn new(params: IrParameters) -> Self {
        Self { params }
    }

    /// Runs the bare pass over all `symbols`, then the risk-adjusted pass.
    ///
    /// The benchmark itself is not compared with itself. A comparison that fails, for
    /// instance because an instrument has no prices in the table, is logged and
    /// recorded in the report; the remaining comparisons still run.
    pub fn run(&self, table: &mut TimeSeriesTable, symbols: &[String]) -> RunReport {
        let mut report = RunReport::default();
        let benchmark = self.params.benchmark.as_str();

        for variant in [IrVariant::Bare, IrVariant::RiskAdjusted] {
            for symbol in symbols.iter().filter(|s| s.as_str() != benchmark) {
                match InformationRatioCalculator::compute(
                    table,
                    symbol,
                    benchmark,
                    self.params.window,
                    self.params.risk_free_rate,
                    variant,
                ) {
                    Ok(Some(key)) => {
                        if !report.computed.contains(&key) {
                            report.computed.push(key);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(
                            investment = %symbol,
                            %benchmark,
                            %variant,
                            error = %e,
                            "Skipping information ratio."
                        );
                        report.skipped.push(SkippedComparison {
                            investment: symbol.clone(),
                            variant,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            computed = report.computed.len(),
            skipped = report.skipped.len(),
            "Information ratio run finished."
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use timeseries::DEFAULT_INDEX;

    fn table() -> TimeSeriesTable {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut table =
            TimeSeriesTable::new(DEFAULT_INDEX, start.iter_days().take(30).collect()).unwrap();
        for (instrument, slope) in [("A", 1.0), ("B", 0.5), ("BENCH", 0.2)] {
            let closes = (0..30)
                .map(|i| 50.0 + slope * i as f64 + (i as f64).cos())
                .collect();
            table
                .insert_column(ColumnKey::close(instrument), closes)
                .unwrap();
        }
        table
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn runs_bare_pass_before_risk_adjusted_pass() {
        let mut t = table();
        let engine = AnalyticsEngine::new(IrParameters {
            benchmark: "BENCH".to_string(),
            window: 5,
            risk_free_rate: 0.01,
        });

        let report = engine.run(&mut t, &symbols(&["A", "B", "BENCH"]));

        let names: Vec<String> = report.computed.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["A_BENCH_IR_5", "B_BENCH_IR_5", "A_BENCH_IRA_5", "B_BENCH_IRA_5"]);
        assert!(report.skipped.is_empty());
        assert!(t.column_by_name("BENCH_Close_SR_5").is_some());
    }

    #[test]
    fn missing_instruments_are_skipped_not_fatal() {
        let mut t = table();
        let engine = AnalyticsEngine::new(IrParameters {
            benchmark: "BENCH".to_string(),
            window: 5,
            risk_free_rate: 0.01,
        });

        let report = engine.run(&mut t, &symbols(&["GONE", "A", "BENCH"]));

        assert_eq!(report.computed.len(), 2);
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped.iter().all(|s| s.investment == "GONE"));
        assert_eq!(report.skipped[0].variant, IrVariant::Bare);
        assert_eq!(report.skipped[1].variant, IrVariant::RiskAdjusted);
    }
}
