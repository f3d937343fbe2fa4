use crate::error::AnalyticsError;
use crate::returns::ReturnsCalculator;
use crate::rolling::{ratio, rolling_mean, rolling_std};
use crate::sharpe::SharpeCalculator;
use core_types::{ColumnKey, IrVariant, PriceField, ReturnKind};
use timeseries::TimeSeriesTable;

/// Computes rolling information ratios of an investment against a benchmark.
#[derive(Debug, Default)]
pub struct InformationRatioCalculator;

impl InformationRatioCalculator {
    /// Adds the `{investment}_{benchmark}_IR_{window}` column (`_IRA_` for the
    /// risk-adjusted variant) to `table`.
    ///
    /// Bare returns of both instruments are computed (or reused) first. The
    /// risk-adjusted variant passes each of them through the Sharpe layer. The ratio
    /// is the rolling mean of the return differential over its rolling standard
    /// deviation, both over up to `window` rows, and is forward-filled where undefined.
    ///
    /// Returns `Ok(None)` without touching the table when `investment` and
    /// `benchmark` are the same instrument.
    pub fn compute(
        table: &mut TimeSeriesTable,
        investment: &str,
        benchmark: &str,
        window: usize,
        risk_free_rate: f64,
        variant: IrVariant,
    ) -> Result<Option<ColumnKey>, AnalyticsError> {
        if investment == benchmark {
            tracing::warn!(
                %investment,
                "Information ratios only make sense between different instruments."
            );
            return Ok(None);
        }
        if window == 0 {
            return Err(AnalyticsError::InvalidWindow(window));
        }

        // Both legs are checked up front so a failed call leaves the table as it was.
        for instrument in [investment, benchmark] {
            if !table.contains(&ColumnKey::close(instrument)) {
                tracing::warn!(%instrument, "Cannot compute information ratio: no closing prices.");
                return Err(AnalyticsError::MissingField {
                    instrument: instrument.to_string(),
                    field: PriceField::Close,
                });
            }
        }

        let investment_bare =
            ReturnsCalculator::compute(table, investment, ReturnKind::Simple, window)?;
        let benchmark_bare =
            ReturnsCalculator::compute(table, benchmark, ReturnKind::Simple, window)?;

        let (investment_returns, benchmark_returns) = match variant {
            IrVariant::Bare => (investment_bare, benchmark_bare),
            IrVariant::RiskAdjusted => (
                SharpeCalculator::compute(table, &investment_bare, risk_free_rate, window)?,
                SharpeCalculator::compute(table, &benchmark_bare, risk_free_rate, window)?,
            ),
        };

        let key = ColumnKey::information_ratio(investment, benchmark, variant, window);
        if table.contains(&key) {
            tracing::debug!(column = %key, "Information ratio already present, reusing it.");
            return Ok(Some(key));
        }

        let lhs = table
            .column(&investment_returns)
            .ok_or_else(|| AnalyticsError::MissingColumn(investment_returns.to_string()))?;
        let rhs = table
            .column(&benchmark_returns)
            .ok_or_else(|| AnalyticsError::MissingColumn(benchmark_returns.to_string()))?;

        let ratios = rolling_information_ratio(lhs, rhs, window);
        table.insert_column(key.clone(), ratios)?;
        table.forward_fill_column(&key)?;
        tracing::info!(column = %key, "Added information ratio column.");
        Ok(Some(key))
    }
}

/// Rolling information ratio of two aligned return series.
///
/// `raw_alpha` is the per-row differential. Its dispersion and its smoothed mean are
/// both taken from the unsmoothed series, over up to `window` rows with no minimum
/// history. Rows where the dispersion is zero or undefined yield NaN.
pub fn rolling_information_ratio(investment: &[f64], benchmark: &[f64], window: usize) -> Vec<f64> {
    let raw_alpha: Vec<f64> = investment
        .iter()
        .zip(benchmark)
        .map(|(lhs, rhs)| lhs - rhs)
        .collect();

    let omega = rolling_std(&raw_alpha, window, 0);
    let smoothed_alpha = rolling_mean(&raw_alpha, window, 0);

    smoothed_alpha
        .iter()
        .zip(&omega)
        .map(|(&alpha, &omega)| ratio(alpha, omega))
        .collect()
}
