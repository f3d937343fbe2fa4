use crate::error::TableError;
use crate::fill::forward_fill;
use crate::table::TimeSeriesTable;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Ordered outer join of two tables on their date indices, followed by a forward fill.
///
/// The result is indexed by the sorted union of both date indices and carries every
/// column of `left` followed by every column of `right`. A gap at a date is filled
/// with the latest earlier value of the same column; gaps before a column's first
/// value stay undefined.
///
/// `left_on` and `right_on` name the index each side is joined on and must match
/// the tables' index labels. The result keeps the left label.
pub fn merge_ordered(
    left: &TimeSeriesTable,
    right: &TimeSeriesTable,
    left_on: &str,
    right_on: &str,
) -> Result<TimeSeriesTable, TableError> {
    check_index(left, left_on)?;
    check_index(right, right_on)?;

    let dates: Vec<NaiveDate> = left
        .dates()
        .iter()
        .chain(right.dates())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut merged = TimeSeriesTable::new(left_on, dates.clone())?;
    for side in [left, right] {
        // Row of each of this side's dates within the union.
        let rows: Vec<usize> = side
            .dates()
            .iter()
            .map(|date| dates.binary_search(date).unwrap_or_else(|row| row))
            .collect();

        for (key, values) in side.columns() {
            let mut aligned = vec![f64::NAN; dates.len()];
            for (&row, &value) in rows.iter().zip(values) {
                aligned[row] = value;
            }
            forward_fill(&mut aligned);
            merged.insert_column(key.clone(), aligned)?;
        }
    }

    tracing::debug!(
        rows = merged.len(),
        columns = merged.width(),
        "Merged tables on '{}'/'{}'.",
        left_on,
        right_on
    );
    Ok(merged)
}

/// Merges `tables` one at a time, the first one being the left-most.
pub fn merge_all(
    tables: &[TimeSeriesTable],
    left_on: &str,
    right_on: &str,
) -> Result<TimeSeriesTable, TableError> {
    let (first, rest) = tables.split_first().ok_or(TableError::NothingToMerge)?;

    let mut merged = first.clone();
    for table in rest {
        merged = merge_ordered(&merged, table, left_on, right_on)?;
    }
    Ok(merged)
}

fn check_index(table: &TimeSeriesTable, label: &str) -> Result<(), TableError> {
    if table.index_name() == label {
        Ok(())
    } else {
        Err(TableError::MissingIndex {
            label: label.to_string(),
            found: table.index_name().to_string(),
        })
    }
}
