use crate::PriceSource;
use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{Bar, ColumnKey, PriceField};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Per-instrument CSV files of daily bars, one `<symbol>.csv` per instrument.
///
/// The header names each column after the instrument (`Date,GADGX_Open,...,GADGX_Volume`)
/// so a snapshot reads the same as the corresponding columns of the merged table.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    /// Writes `bars` for `symbol`, replacing any earlier snapshot.
    pub fn save(&self, symbol: &str, bars: &[Bar]) -> Result<PathBuf, ApiError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(symbol);
        let mut writer = csv::Writer::from_path(&path)?;

        let mut header = vec!["Date".to_string()];
        header.extend(
            PriceField::ALL
                .iter()
                .map(|field| ColumnKey::field(symbol, *field).to_string()),
        );
        writer.write_record(&header)?;

        for bar in bars {
            let mut record = vec![bar.date.format(DATE_FORMAT).to_string()];
            record.extend(PriceField::ALL.iter().map(|field| bar.field(*field).to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;

        tracing::debug!(%symbol, rows = bars.len(), path = %path.display(), "Snapshot written.");
        Ok(path)
    }

    /// Reads the snapshot of `symbol`, in file order.
    pub fn load(&self, symbol: &str) -> Result<Vec<Bar>, ApiError> {
        let path = self.path(symbol);
        if !path.exists() {
            return Err(ApiError::SnapshotMissing(path));
        }
        let mut reader = csv::Reader::from_path(&path)?;

        let headers = reader.headers()?.clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| {
                    ApiError::InvalidData(format!("{}: missing column '{name}'", path.display()))
                })
        };
        let date_at = position("Date")?;
        let mut field_at = Vec::with_capacity(PriceField::ALL.len());
        for field in PriceField::ALL {
            field_at.push(position(&ColumnKey::field(symbol, field).to_string())?);
        }

        let mut bars = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cell = |at: usize| record.get(at).unwrap_or_default();

            let date = NaiveDate::parse_from_str(cell(date_at), DATE_FORMAT)
                .map_err(|e| ApiError::InvalidData(format!("Bad date '{}': {e}", cell(date_at))))?;
            let mut values = [Decimal::ZERO; 5];
            for (value, &at) in values.iter_mut().zip(&field_at) {
                *value = Decimal::from_str(cell(at))
                    .map_err(|e| {
                        ApiError::InvalidData(format!("Bad number '{}' on {date}: {e}", cell(at)))
                    })?;
            }
            let [open, high, low, close, volume] = values;

            bars.push(Bar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        Ok(bars)
    }
}

/// Serves previously saved snapshots as if they were fetched, clipped to the requested range.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    store: SnapshotStore,
}

impl SnapshotSource {
    pub fn new(store: SnapshotStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PriceSource for SnapshotSource {
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, ApiError> {
        let bars = self.store.load(symbol)?;
        Ok(bars
            .into_iter()
            .filter(|bar| bar.date >= start && bar.date <= end)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    fn bar(d: u32, close: Decimal) -> Bar {
        Bar {
            date: day(d),
            open: close - dec!(0.5),
            high: close + dec!(1),
            low: close - dec!(1),
            close,
            volume: dec!(1000),
        }
    }

    #[test]
    fn save_then_load_restores_bars() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("fund_details"));
        let bars = vec![bar(1, dec!(20.25)), bar(2, dec!(20.75)), bar(3, dec!(21.1))];

        let path = store.save("GADGX", &bars).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Date,GADGX_Open,GADGX_High,GADGX_Low,GADGX_Close,GADGX_Volume\n"));
        assert!(text.contains("2021-03-02,20.25,21.75,19.75,20.75,1000"));
        assert_eq!(store.load("GADGX").unwrap(), bars);
    }

    #[test]
    fn missing_snapshot_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());

        let err = store.load("^DJI").unwrap_err();

        assert!(matches!(err, ApiError::SnapshotMissing(path) if path.ends_with("^DJI.csv")));
    }

    #[test]
    fn snapshot_of_another_symbol_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.save("MCSMX", &[bar(1, dec!(10))]).unwrap();
        std::fs::rename(store.path("MCSMX"), store.path("GADGX")).unwrap();

        assert!(matches!(store.load("GADGX"), Err(ApiError::InvalidData(_))));
    }

    #[tokio::test]
    async fn source_clips_to_requested_range() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let bars: Vec<Bar> = (1..=10).map(|d| bar(d, Decimal::from(d))).collect();
        store.save("X", &bars).unwrap();

        let source = SnapshotSource::new(store);
        let clipped = source.fetch_daily_bars("X", day(3), day(6)).await.unwrap();

        assert_eq!(clipped.len(), 4);
        assert_eq!(clipped[0].date, day(3));
        assert_eq!(clipped[3].date, day(6));
    }
}
