use crate::PriceSource;
use crate::error::ApiError;
use crate::responses::{ChartResponse, ChartResult};
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate};
use core_types::Bar;
use reqwest::Url;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// The chart endpoint rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Daily bars from the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: Url,
}

impl YahooClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidData(format!("Invalid base URL '{base_url}': {e}")))?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::InvalidData(format!("Cannot use '{}' as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

#[async_trait]
impl PriceSource for YahooClient {
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, ApiError> {
        let period1 = start.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp()).unwrap_or(0);
        let period2 = end
            .checked_add_days(Days::new(1))
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|t| t.and_utc().timestamp())
            .unwrap_or(i64::MAX);

        tracing::debug!(%symbol, %start, %end, "Requesting daily bars.");
        let response = self
            .client
            .get(self.chart_url(symbol)?)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        let chart = match serde_json::from_str::<ChartResponse>(&text) {
            Ok(chart) => chart,
            Err(e) if status.is_success() => return Err(ApiError::Deserialization(e.to_string())),
            Err(_) => {
                return Err(ApiError::Provider {
                    symbol: symbol.to_string(),
                    message: format!("HTTP {status}"),
                });
            }
        };

        let bars = bars_from_chart(symbol, chart)?;
        Ok(bars
            .into_iter()
            .filter(|bar| bar.date >= start && bar.date <= end)
            .collect())
    }
}

/// Converts a chart response into bars, dropping sessions with a missing price.
///
/// Each timestamp is shifted into the exchange's time zone before its date is taken.
/// A missing volume is recorded as zero.
pub fn bars_from_chart(symbol: &str, response: ChartResponse) -> Result<Vec<Bar>, ApiError> {
    if let Some(error) = response.chart.error {
        return Err(ApiError::Provider {
            symbol: symbol.to_string(),
            message: format!("{}: {}", error.code, error.description),
        });
    }

    let result: ChartResult = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ApiError::NoData(symbol.to_string()))?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &timestamp) in result.timestamp.iter().enumerate() {
        let date = DateTime::from_timestamp(timestamp + offset, 0)
            .ok_or_else(|| ApiError::InvalidData(format!("Invalid timestamp: {timestamp}")))?
            .date_naive();

        let price = |series: &[Option<f64>]| {
            series.get(i).copied().flatten().and_then(Decimal::from_f64)
        };
        let (Some(open), Some(high), Some(low), Some(close)) = (
            price(&quote.open),
            price(&quote.high),
            price(&quote.low),
            price(&quote.close),
        ) else {
            tracing::debug!(%symbol, %date, "Skipping session with missing prices.");
            continue;
        };
        let volume = price(&quote.volume).unwrap_or(Decimal::ZERO);

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
