use core_types::PriceField;
use thiserror::Error;
use timeseries::TableError;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Missing data: instrument '{instrument}' has no {field} column")]
    MissingField {
        instrument: String,
        field: PriceField,
    },

    #[error("Column '{0}' does not exist in the table")]
    MissingColumn(String),

    #[error("Column '{0}' does not hold simple returns")]
    NotSimpleReturns(String),

    #[error("Window must span at least one period, got {0}")]
    InvalidWindow(usize),

    #[error("Table error: {0}")]
    Table(#[from] TableError),
}
