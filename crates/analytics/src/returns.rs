use crate::error::AnalyticsError;
use crate::rolling::shift;
use core_types::{ColumnKey, PriceField, ReturnKind};
use timeseries::{TimeSeriesTable, fill_undefined};

/// Derives windowed returns from an instrument's closing prices.
#[derive(Debug, Default)]
pub struct ReturnsCalculator;

impl ReturnsCalculator {
    /// Adds the `{instrument}_Close_R_{window}` (or `_LR_{window}`) column to `table`.
    ///
    /// Simple returns are `(p[t] - p[t - window]) / p[t]`; log returns are the natural
    /// logarithm of the same quotient. Every undefined result, including the first
    /// `window` rows, is stored as `0.0`.
    ///
    /// Requesting a column that already exists is a no-op returning its key.
    ///
    /// # Errors
    ///
    /// `MissingField` when the instrument has no closing-price column; the table is
    /// left untouched.
    pub fn compute(
        table: &mut TimeSeriesTable,
        instrument: &str,
        kind: ReturnKind,
        window: usize,
    ) -> Result<ColumnKey, AnalyticsError> {
        if window == 0 {
            return Err(AnalyticsError::InvalidWindow(window));
        }

        let price_key = ColumnKey::close(instrument);
        let Some(prices) = table.column(&price_key) else {
            tracing::warn!(%instrument, "Cannot compute returns: no closing prices in the table.");
            return Err(AnalyticsError::MissingField {
                instrument: instrument.to_string(),
                field: PriceField::Close,
            });
        };

        let key = ColumnKey::returns(instrument, PriceField::Close, kind, window);
        if table.contains(&key) {
            tracing::debug!(column = %key, "Returns already present, reusing them.");
            return Ok(key);
        }

        let mut values = windowed_returns(prices, kind, window);
        fill_undefined(&mut values, 0.0);

        table.insert_column(key.clone(), values)?;
        tracing::debug!(column = %key, "Added returns column.");
        Ok(key)
    }
}

/// Windowed returns before any fill policy is applied.
pub fn windowed_returns(prices: &[f64], kind: ReturnKind, window: usize) -> Vec<f64> {
    let lagged = shift(prices, window);
    prices
        .iter()
        .zip(&lagged)
        .map(|(&price, &past)| {
            let simple = (price - past) / price;
            match kind {
                ReturnKind::Simple => simple,
                ReturnKind::Log => simple.ln(),
            }
        })
        .collect()
}
