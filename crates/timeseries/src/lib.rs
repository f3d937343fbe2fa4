//! # Time-series tables
//!
//! The date-indexed, column-typed table shared by the whole pipeline, and the
//! aligner that merges per-instrument tables into one wide table.
//!
//! ## Public API
//!
//! - `TimeSeriesTable`: ascending date index plus append-only `f64` columns keyed by `ColumnKey`.
//! - `merge_ordered` / `merge_all`: ordered outer join with forward fill.
//! - `forward_fill` / `fill_undefined`: the two fill policies used by the calculators.
//! - `TableError`: the error type of this crate.

pub mod align;
pub mod error;
pub mod fill;
pub mod table;

pub use align::{merge_all, merge_ordered};
pub use error::TableError;
pub use fill::{fill_undefined, forward_fill};
pub use table::{DEFAULT_INDEX, TimeSeriesTable};
