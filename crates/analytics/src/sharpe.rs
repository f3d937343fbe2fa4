use crate::error::AnalyticsError;
use crate::rolling::{mean, ratio, rolling_apply, sample_std};
use core_types::ColumnKey;
use timeseries::TimeSeriesTable;

/// Layers a rolling Sharpe ratio on top of a simple-returns column.
#[derive(Debug, Default)]
pub struct SharpeCalculator;

impl SharpeCalculator {
    /// Adds the Sharpe column derived from `returns` (`X_Close_R_50` gives `X_Close_SR_50`).
    ///
    /// The annual `risk_free_rate` is scaled by `365 / window`. Each full window of
    /// `window` rows yields `(mean - scaled rate) / sample std`; the first `window - 1`
    /// rows stay undefined, as does any window with zero dispersion.
    ///
    /// If the Sharpe column already exists its key is returned unchanged.
    pub fn compute(
        table: &mut TimeSeriesTable,
        returns: &ColumnKey,
        risk_free_rate: f64,
        window: usize,
    ) -> Result<ColumnKey, AnalyticsError> {
        if window == 0 {
            return Err(AnalyticsError::InvalidWindow(window));
        }

        let key = ColumnKey::sharpe_of(returns)
            .ok_or_else(|| AnalyticsError::NotSimpleReturns(returns.to_string()))?;
        let values = table
            .column(returns)
            .ok_or_else(|| AnalyticsError::MissingColumn(returns.to_string()))?;

        if table.contains(&key) {
            tracing::debug!(column = %key, "Sharpe ratios already present, reusing them.");
            return Ok(key);
        }

        let sharpe = rolling_sharpe(values, risk_free_rate, window);
        table.insert_column(key.clone(), sharpe)?;
        tracing::debug!(column = %key, "Added Sharpe ratio column.");
        Ok(key)
    }
}

/// The risk-free rate over one window: the annual rate scaled by `365 / window`.
pub fn window_risk_free_rate(annual_rate: f64, window: usize) -> f64 {
    annual_rate * (365.0 / window as f64)
}

/// Rolling Sharpe ratio of `returns` over full windows of `window` rows.
pub fn rolling_sharpe(returns: &[f64], risk_free_rate: f64, window: usize) -> Vec<f64> {
    let hurdle = window_risk_free_rate(risk_free_rate, window);
    rolling_apply(returns, window, |slice| {
        ratio(mean(slice) - hurdle, sample_std(slice))
    })
}
