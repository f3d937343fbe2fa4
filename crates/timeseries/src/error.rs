use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Date index must be strictly ascending, found {previous} followed by {next}")]
    UnsortedIndex { previous: NaiveDate, next: NaiveDate },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Column '{column}' has {actual} values but the table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{0}' already exists in the table")]
    DuplicateColumn(String),

    #[error("Column '{0}' does not exist in the table")]
    MissingColumn(String),

    #[error("Cannot join on '{label}': the table is indexed by '{found}'")]
    MissingIndex { label: String, found: String },

    #[error("No tables were given to merge")]
    NothingToMerge,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
