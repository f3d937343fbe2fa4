use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The provider returned an error for '{symbol}': {message}")]
    Provider { symbol: String, message: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format: {0}")]
    InvalidData(String),

    #[error("No price data available for '{0}'")]
    NoData(String),

    #[error("No snapshot found at {0}")]
    SnapshotMissing(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
