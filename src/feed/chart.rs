//! Yahoo Finance chart API (`/v8/finance/chart/{symbol}`) decoding.

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;
use reqwest::Url;
use serde::Deserialize;

use super::Bar;
use crate::error::{FetchError, FetchResult};

/// History window requested from the chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartRange {
    /// Two years of daily bars, enough for a 200-day average
    Daily2y,
    /// Three months of weekly bars
    Weekly3mo,
    /// Last few sessions, for day-over-day deltas and latest levels
    Recent5d,
}

impl ChartRange {
    pub fn params(self) -> (&'static str, &'static str) {
        match self {
            ChartRange::Daily2y => ("2y", "1d"),
            ChartRange::Weekly3mo => ("3mo", "1wk"),
            ChartRange::Recent5d => ("5d", "1d"),
        }
    }
}

#[derive(Deserialize, Debug)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize, Debug)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartApiError>,
}

#[derive(Deserialize, Debug)]
struct ChartApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Deserialize, Debug)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Deserialize, Debug)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub fn chart_url(base: &str, symbol: &str, range: ChartRange) -> FetchResult<Url> {
    let (range, interval) = range.params();
    let raw = format!("{}/v8/finance/chart/{}", base.trim_end_matches('/'), symbol);
    Url::parse_with_params(&raw, &[("range", range), ("interval", interval)])
        .map_err(|e| FetchError::Parse(format!("chart url for {}: {}", symbol, e)))
}

/// Decode a chart response into bars, oldest first. Null closes (halted or
/// in-progress sessions) are skipped; bar dates are taken in `tz`.
pub fn parse_chart(body: &str, tz: Tz) -> FetchResult<Vec<Bar>> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(err) = envelope.chart.error {
        return Err(FetchError::Empty(format!("{}: {}", err.code, err.description)));
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::Empty("chart result missing".into()))?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let bars: Vec<Bar> = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(&ts, close)| {
            let close = close.filter(|c| c.is_finite())?;
            let date = epoch_to_date(ts, tz)?;
            Some(Bar { date, close })
        })
        .collect();

    Ok(bars)
}

fn epoch_to_date(ts: i64, tz: Tz) -> Option<NaiveDate> {
    tz.timestamp_opt(ts, 0).single().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NY: Tz = chrono_tz::America::New_York;

    #[test]
    fn test_parse_skips_null_closes() {
        // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC
        let body = r#"{"chart":{"result":[{
            "meta":{"symbol":"SPY"},
            "timestamp":[1704205800,1704292200,1704378600],
            "indicators":{"quote":[{"close":[472.65,null,467.28]}]}
        }],"error":null}}"#;
        let bars = parse_chart(body, NY).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[1].close, 467.28);
    }

    #[test]
    fn test_parse_api_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart(body, NY).unwrap_err();
        assert!(matches!(err, FetchError::Empty(_)));
    }

    #[test]
    fn test_parse_garbage_is_decode_error() {
        let err = parse_chart("<html>rate limited</html>", NY).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_chart_url() {
        let url = chart_url("https://query1.finance.yahoo.com/", "SPY", ChartRange::Weekly3mo).unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/SPY");
        assert_eq!(url.query(), Some("range=3mo&interval=1wk"));
    }
}
