//! Shared domain types for the information-ratio pipeline.
//!
//! This crate has no knowledge of tables, calculators or data providers. It defines
//! the daily `Bar` delivered by providers and the typed `ColumnKey` that every other
//! crate uses to address columns.

pub mod column;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use column::ColumnKey;
pub use enums::{IrVariant, PriceField, ReturnKind};
pub use error::CoreError;
pub use structs::Bar;
