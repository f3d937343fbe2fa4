use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::Bar;
use futures::future::join_all;

pub mod error;
pub mod responses;
pub mod snapshot;
pub mod yahoo;

// --- Public API ---
pub use error::ApiError;
pub use snapshot::{SnapshotSource, SnapshotStore};
pub use yahoo::{DEFAULT_BASE_URL, YahooClient, bars_from_chart};

/// The abstract interface for anything that can deliver daily bars.
/// The pipeline only ever talks to this trait, so a live provider, a snapshot
/// directory or a test double can be swapped in freely.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetches the daily bars of `symbol` dated within `start..=end`, oldest first.
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, ApiError>;
}

/// Fetches every symbol concurrently.
///
/// Results keep the order of `symbols`. A symbol that fails or returns no bars is
/// logged and left out, so one bad ticker does not abort the run. `on_done` is called
/// once per symbol as soon as its request settles.
pub async fn fetch_all<S, F>(
    source: &S,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    on_done: F,
) -> Vec<(String, Vec<Bar>)>
where
    S: PriceSource + ?Sized,
    F: Fn(&str),
{
    let requests = symbols.iter().map(|symbol| {
        let on_done = &on_done;
        async move {
            let result = source.fetch_daily_bars(symbol, start, end).await;
            on_done(symbol);
            (symbol, result)
        }
    });

    join_all(requests)
        .await
        .into_iter()
        .filter_map(|(symbol, result)| match result {
            Ok(bars) if bars.is_empty() => {
                tracing::warn!(%symbol, %start, %end, "No bars in range, skipping.");
                None
            }
            Ok(bars) => {
                tracing::info!(%symbol, rows = bars.len(), "Fetched daily bars.");
                Some((symbol.clone(), bars))
            }
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "Failed to fetch bars, skipping.");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves canned bars, answering later symbols first to shake out ordering bugs.
    struct MockSource {
        bars: HashMap<String, Vec<Bar>>,
    }

    #[async_trait]
    impl PriceSource for MockSource {
        async fn fetch_daily_bars(
            &self,
            symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<Bar>, ApiError> {
            let delay = 30u64.saturating_sub(10 * symbol.len() as u64);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.bars
                .get(symbol)
                .cloned()
                .ok_or_else(|| ApiError::NoData(symbol.to_string()))
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 6, d).unwrap()
    }

    fn bars(n: u32) -> Vec<Bar> {
        (1..=n)
            .map(|d| Bar {
                date: day(d),
                open: Decimal::from(d),
                high: Decimal::from(d),
                low: Decimal::from(d),
                close: Decimal::from(d),
                volume: Decimal::ZERO,
            })
            .collect()
    }

    #[tokio::test]
    async fn keeps_input_order_and_skips_failures() {
        let source = MockSource {
            bars: HashMap::from([
                ("A".to_string(), bars(3)),
                ("BB".to_string(), Vec::new()),
                ("^DJI".to_string(), bars(5)),
            ]),
        };
        let symbols: Vec<String> = ["^DJI", "BB", "MISSING", "A"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let settled = Mutex::new(Vec::new());

        let fetched = fetch_all(&source, &symbols, day(1), day(30), |symbol| {
            settled.lock().unwrap().push(symbol.to_string());
        })
        .await;

        let names: Vec<&str> = fetched.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, ["^DJI", "A"]);
        assert_eq!(fetched[0].1.len(), 5);
        assert_eq!(fetched[1].1.len(), 3);
        assert_eq!(settled.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn works_through_a_trait_object() {
        let source: Box<dyn PriceSource> = Box::new(MockSource {
            bars: HashMap::from([("A".to_string(), bars(2))]),
        });

        let fetched = fetch_all(source.as_ref(), &["A".to_string()], day(1), day(2), |_| {}).await;

        assert_eq!(fetched.len(), 1);
    }
}
