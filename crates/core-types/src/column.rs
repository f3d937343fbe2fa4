use crate::enums::{IrVariant, PriceField, ReturnKind};
use serde::{Serialize, Serializer};
use std::fmt;

/// The typed identity of a column in a time-series table.
///
/// Every derived column records how it was derived. The compound string name
/// (e.g. `GADGX_Close_R_92` or `GADGX_^DJI_IRA_92`) is rendered by `Display`
/// and is what downstream consumers use to address columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// A raw field, `{instrument}_{field}`.
    Field {
        instrument: String,
        field: PriceField,
    },
    /// Windowed returns, `{instrument}_{field}_R_{window}` or `_LR_{window}`.
    Returns {
        instrument: String,
        field: PriceField,
        kind: ReturnKind,
        window: usize,
    },
    /// Rolling Sharpe ratio of simple returns, `{instrument}_{field}_SR_{window}`.
    Sharpe {
        instrument: String,
        field: PriceField,
        window: usize,
    },
    /// Rolling information ratio, `{investment}_{benchmark}_IR_{window}` or `_IRA_{window}`.
    InformationRatio {
        investment: String,
        benchmark: String,
        variant: IrVariant,
        window: usize,
    },
}

impl ColumnKey {
    pub fn field(instrument: &str, field: PriceField) -> Self {
        ColumnKey::Field {
            instrument: instrument.to_string(),
            field,
        }
    }

    pub fn close(instrument: &str) -> Self {
        Self::field(instrument, PriceField::Close)
    }

    pub fn returns(instrument: &str, field: PriceField, kind: ReturnKind, window: usize) -> Self {
        ColumnKey::Returns {
            instrument: instrument.to_string(),
            field,
            kind,
            window,
        }
    }

    pub fn information_ratio(
        investment: &str,
        benchmark: &str,
        variant: IrVariant,
        window: usize,
    ) -> Self {
        ColumnKey::InformationRatio {
            investment: investment.to_string(),
            benchmark: benchmark.to_string(),
            variant,
            window,
        }
    }

    /// The Sharpe column derived from a simple-returns column: the `_R_` marker becomes `_SR_`.
    ///
    /// Returns `None` for anything that is not a simple-returns column.
    pub fn sharpe_of(returns: &ColumnKey) -> Option<ColumnKey> {
        match returns {
            ColumnKey::Returns {
                instrument,
                field,
                kind: ReturnKind::Simple,
                window,
            } => Some(ColumnKey::Sharpe {
                instrument: instrument.clone(),
                field: *field,
                window: *window,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Field { instrument, field } => write!(f, "{instrument}_{field}"),
            ColumnKey::Returns {
                instrument,
                field,
                kind,
                window,
            } => write!(f, "{instrument}_{field}_{}_{window}", kind.marker()),
            ColumnKey::Sharpe {
                instrument,
                field,
                window,
            } => write!(f, "{instrument}_{field}_SR_{window}"),
            ColumnKey::InformationRatio {
                investment,
                benchmark,
                variant,
                window,
            } => write!(f, "{investment}_{benchmark}_{}_{window}", variant.marker()),
        }
    }
}

// Columns are serialized by their compound name.
impl Serialize for ColumnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
