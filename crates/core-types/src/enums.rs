use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the OHLCV fields recorded for every instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceField {
    /// All fields, in the column order used by per-instrument tables and snapshots.
    pub const ALL: [PriceField; 5] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
        PriceField::Volume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::Volume => "Volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriceField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput("price field".to_string(), s.to_string()))
    }
}

/// Simple or logarithmic windowed returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnKind {
    Simple,
    Log,
}

impl ReturnKind {
    /// The marker embedded in a returns column name.
    pub fn marker(&self) -> &'static str {
        match self {
            ReturnKind::Simple => "R",
            ReturnKind::Log => "LR",
        }
    }
}

/// Whether an information ratio is built on bare returns or on Sharpe-adjusted returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrVariant {
    Bare,
    RiskAdjusted,
}

impl IrVariant {
    pub fn marker(&self) -> &'static str {
        match self {
            IrVariant::Bare => "IR",
            IrVariant::RiskAdjusted => "IRA",
        }
    }
}

impl fmt::Display for IrVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrVariant::Bare => f.write_str("bare"),
            IrVariant::RiskAdjusted => f.write_str("risk-adjusted"),
        }
    }
}
