use crate::rolling::{mean, sample_std};
use core_types::{ColumnKey, IrVariant};
use serde::{Deserialize, Serialize};
use timeseries::TimeSeriesTable;

/// Number of bins in every summary histogram.
pub const HISTOGRAM_BINS: usize = 12;

/// Equal-width histogram over `[edges[0], edges[bins]]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Distribution of one information-ratio column, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrSummary {
    pub column: String,
    pub investment: String,
    pub benchmark: String,
    pub variant: IrVariant,
    pub window: usize,
    /// Number of finite values in the column.
    pub observations: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// The most recent finite value.
    pub last: Option<f64>,
    pub histogram: Histogram,
}

impl IrSummary {
    /// Summarizes an information-ratio column. Returns `None` for any other kind of key.
    pub fn from_column(key: &ColumnKey, values: &[f64]) -> Option<Self> {
        let ColumnKey::InformationRatio {
            investment,
            benchmark,
            variant,
            window,
        } = key
        else {
            return None;
        };

        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let min = finite.iter().copied().reduce(f64::min);
        let max = finite.iter().copied().reduce(f64::max);

        Some(Self {
            column: key.to_string(),
            investment: investment.clone(),
            benchmark: benchmark.clone(),
            variant: *variant,
            window: *window,
            observations: finite.len(),
            mean: defined(mean(&finite)),
            std_dev: defined(sample_std(&finite)),
            min,
            max,
            last: finite.last().copied(),
            histogram: histogram(&finite, HISTOGRAM_BINS),
        })
    }
}

/// Summaries of every information-ratio column among `keys` present in `table`.
pub fn summarize(table: &TimeSeriesTable, keys: &[ColumnKey]) -> Vec<IrSummary> {
    keys.iter()
        .filter_map(|key| {
            table
                .column(key)
                .and_then(|values| IrSummary::from_column(key, values))
        })
        .collect()
}

/// Equal-width histogram of finite `values`.
///
/// A degenerate range (all values equal) is widened to `[v - 0.5, v + 0.5]`. The last
/// bin includes its right edge.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let (Some(lo), Some(hi)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Histogram::default();
    };
    if bins == 0 {
        return Histogram::default();
    }

    let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let width = (hi - lo) / bins as f64;

    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for value in values {
        let bin = (((value - lo) / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Histogram { edges, counts }
}

fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
