use crate::error::TableError;
use crate::fill::forward_fill;
use chrono::NaiveDate;
use core_types::{Bar, ColumnKey, PriceField};
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;
use std::io::Write;

/// Label of the date index used by provider data.
pub const DEFAULT_INDEX: &str = "Date";

/// A table of numeric columns keyed by an ascending sequence of dates.
///
/// Every column holds exactly one value per date. `NaN` is the explicit
/// "undefined" marker. Columns are appended by calculators and are never
/// removed or overwritten.
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    index_name: String,
    dates: Vec<NaiveDate>,
    columns: Vec<(ColumnKey, Vec<f64>)>,
    lookup: HashMap<ColumnKey, usize>,
}

impl TimeSeriesTable {
    /// Creates an empty table over `dates`, which must be strictly ascending.
    pub fn new(index_name: impl Into<String>, dates: Vec<NaiveDate>) -> Result<Self, TableError> {
        if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(TableError::UnsortedIndex {
                previous: pair[0],
                next: pair[1],
            });
        }

        Ok(Self {
            index_name: index_name.into(),
            dates,
            columns: Vec::new(),
            lookup: HashMap::new(),
        })
    }

    /// A column-less table holding every calendar day from `start` to `end`, inclusive.
    pub fn calendar(start: NaiveDate, end: NaiveDate) -> Result<Self, TableError> {
        if start > end {
            return Err(TableError::InvalidRange { start, end });
        }
        let dates = start.iter_days().take_while(|day| *day <= end).collect();
        Self::new(DEFAULT_INDEX, dates)
    }

    /// Builds the per-instrument table: one `{instrument}_{field}` column per OHLCV field.
    ///
    /// Bars may arrive in any order. When two bars share a date the later one in the
    /// input wins.
    pub fn from_bars(instrument: &str, bars: &[Bar]) -> Result<Self, TableError> {
        let mut sorted: Vec<&Bar> = bars.iter().collect();
        sorted.sort_by_key(|bar| bar.date);

        let mut unique: Vec<&Bar> = Vec::with_capacity(sorted.len());
        for bar in sorted {
            match unique.last_mut() {
                Some(last) if last.date == bar.date => {
                    tracing::debug!(%instrument, date = %bar.date, "Duplicate bar replaced.");
                    *last = bar;
                }
                _ => unique.push(bar),
            }
        }

        let mut table = Self::new(DEFAULT_INDEX, unique.iter().map(|bar| bar.date).collect())?;
        for field in PriceField::ALL {
            let values = unique
                .iter()
                .map(|bar| bar.field(field).to_f64().unwrap_or(f64::NAN))
                .collect();
            table.insert_column(ColumnKey::field(instrument, field), values)?;
        }
        Ok(table)
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Column keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.iter().map(|(key, _)| key)
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&ColumnKey, &[f64])> {
        self.columns
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }

    pub fn contains(&self, key: &ColumnKey) -> bool {
        self.lookup.contains_key(key)
    }

    pub fn column(&self, key: &ColumnKey) -> Option<&[f64]> {
        self.lookup
            .get(key)
            .map(|&position| self.columns[position].1.as_slice())
    }

    /// Looks a column up by its compound name, e.g. `GADGX_^DJI_IR_92`.
    pub fn column_by_name(&self, name: &str) -> Option<(&ColumnKey, &[f64])> {
        self.columns()
            .find(|(key, _)| key.to_string() == name)
    }

    /// Appends a new column. Existing columns are never replaced.
    pub fn insert_column(&mut self, key: ColumnKey, values: Vec<f64>) -> Result<(), TableError> {
        if values.len() != self.len() {
            return Err(TableError::LengthMismatch {
                column: key.to_string(),
                expected: self.len(),
                actual: values.len(),
            });
        }
        if self.contains(&key) {
            return Err(TableError::DuplicateColumn(key.to_string()));
        }

        self.lookup.insert(key.clone(), self.columns.len());
        self.columns.push((key, values));
        Ok(())
    }

    /// Forward-fills a single column in place.
    pub fn forward_fill_column(&mut self, key: &ColumnKey) -> Result<(), TableError> {
        let position = *self
            .lookup
            .get(key)
            .ok_or_else(|| TableError::MissingColumn(key.to_string()))?;
        forward_fill(&mut self.columns[position].1);
        Ok(())
    }

    /// Writes the table as CSV: the date index first, then every column by its
    /// compound name. Undefined cells are written empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.width() + 1);
        header.push(self.index_name.clone());
        header.extend(self.keys().map(ToString::to_string));
        csv_writer.write_record(&header)?;

        for (row, date) in self.dates.iter().enumerate() {
            let mut record = Vec::with_capacity(self.width() + 1);
            record.push(date.format("%Y-%m-%d").to_string());
            for (_, values) in &self.columns {
                let value = values[row];
                record.push(if value.is_nan() {
                    String::new()
                } else {
                    value.to_string()
                });
            }
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
