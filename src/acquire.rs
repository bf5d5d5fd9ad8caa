//! Builds the per-run `MarketSnapshot` from a `MarketData` source.
//!
//! Sources are fetched one after another. Only the primary daily series can
//! abort the run; every other source goes through [`fallback`] and degrades to
//! a value that makes its signal neutral.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::error::{AcquireError, FetchError, FetchResult};
use crate::feed::calendar::high_impact_on;
use crate::feed::{closes, Bar, ChartRange, MarketData};
use crate::indicators::{last_change_bps, last_pct_change, pct_change, sma_last, SMA_LONG};
use crate::logging::log_fallback;

/// Sits inside the 20..=25 band, so a missing VIX alone never moves the score.
pub const NEUTRAL_VIX: f64 = 22.5;
pub const NEUTRAL_BREADTH: f64 = 50.0;

/// Inputs that can fall back to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Sma200,
    Weekly,
    Futures,
    Vix,
    Vix9d,
    Vix3m,
    Dxy,
    Tnx,
    Breadth,
    Calendar,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Sma200 => "sma200",
            Source::Weekly => "weekly",
            Source::Futures => "futures",
            Source::Vix => "vix",
            Source::Vix9d => "vix9d",
            Source::Vix3m => "vix3m",
            Source::Dxy => "dxy",
            Source::Tnx => "tnx",
            Source::Breadth => "breadth",
            Source::Calendar => "calendar",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub current_price: f64,
    pub sma200: f64,
    pub weekly_return: f64,
    pub overnight_pct: f64,
    pub vix: f64,
    pub vix9d: f64,
    pub vix3m: f64,
    pub dxy_change: f64,
    pub tnx_change_bps: f64,
    pub breadth_50: f64,
    /// Title of today's high-impact release, when the calendar was consulted
    pub high_impact_event: Option<String>,
    /// Sources that fell back to their default this run
    pub degraded: Vec<Source>,
}

impl MarketSnapshot {
    /// Snapshot where every secondary input holds its fallback value.
    pub fn neutral(current_price: f64) -> Self {
        Self {
            current_price,
            sma200: current_price,
            weekly_return: 0.0,
            overnight_pct: 0.0,
            vix: NEUTRAL_VIX,
            vix9d: NEUTRAL_VIX,
            vix3m: NEUTRAL_VIX,
            dxy_change: 0.0,
            tnx_change_bps: 0.0,
            breadth_50: NEUTRAL_BREADTH,
            high_impact_event: None,
            degraded: Vec::new(),
        }
    }

    pub fn degraded_names(&self) -> Vec<&'static str> {
        self.degraded.iter().map(Source::as_str).collect()
    }
}

/// Resolve a secondary source: the fetched value on success, otherwise
/// `default`, with the failure logged and `source` recorded as degraded.
pub fn fallback<T: Serialize>(
    source: Source,
    result: FetchResult<T>,
    default: T,
    degraded: &mut Vec<Source>,
) -> T {
    match result {
        Ok(v) => v,
        Err(err) => {
            let default_json = serde_json::to_value(&default).unwrap_or(serde_json::Value::Null);
            log_fallback(source.as_str(), &err.to_string(), default_json);
            degraded.push(source);
            default
        }
    }
}

/// Percent change between the two most recent weekly closes dated on or
/// before `today`. A bar stamped after `today` is an unfinished week and is ignored.
pub fn weekly_return(bars: &[Bar], today: NaiveDate) -> FetchResult<f64> {
    let settled: Vec<f64> = bars
        .iter()
        .filter(|b| b.date <= today)
        .map(|b| b.close)
        .collect();
    if settled.len() < 2 {
        return Err(FetchError::InsufficientHistory { need: 2, have: settled.len() });
    }
    last_pct_change(&settled).ok_or_else(|| FetchError::Parse("zero weekly close".into()))
}

fn last_close(bars: &[Bar], symbol: &str) -> FetchResult<f64> {
    bars.last()
        .map(|b| b.close)
        .ok_or_else(|| FetchError::Empty(symbol.to_string()))
}

fn two_point<F>(bars: &[Bar], f: F) -> FetchResult<f64>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let values = closes(bars);
    f(&values).ok_or(FetchError::InsufficientHistory { need: 2, have: values.len() })
}

pub async fn acquire(
    source: &dyn MarketData,
    cfg: &Config,
    today: NaiveDate,
) -> Result<MarketSnapshot, AcquireError> {
    let primary_err = |e: FetchError| AcquireError::PrimarySeries {
        symbol: cfg.symbol.clone(),
        source: e,
    };

    let daily = source
        .history(&cfg.symbol, ChartRange::Daily2y)
        .await
        .map_err(primary_err)?;
    let current_price = last_close(&daily, &cfg.symbol).map_err(primary_err)?;

    let mut degraded = Vec::new();

    let daily_closes = closes(&daily);
    let sma200 = fallback(
        Source::Sma200,
        sma_last(&daily_closes, SMA_LONG).ok_or(FetchError::InsufficientHistory {
            need: SMA_LONG,
            have: daily_closes.len(),
        }),
        current_price,
        &mut degraded,
    );

    let weekly = source
        .history(&cfg.symbol, ChartRange::Weekly3mo)
        .await
        .and_then(|bars| weekly_return(&bars, today));
    let weekly_return = fallback(Source::Weekly, weekly, 0.0, &mut degraded);

    let overnight = source.futures_quote().await.and_then(|fut| {
        pct_change(current_price, fut).ok_or_else(|| FetchError::Parse(format!("futures quote {}", fut)))
    });
    let overnight_pct = fallback(Source::Futures, overnight, 0.0, &mut degraded);

    let vix = source
        .history(&cfg.vix_symbol, ChartRange::Recent5d)
        .await
        .and_then(|bars| last_close(&bars, &cfg.vix_symbol));
    let vix = fallback(Source::Vix, vix, NEUTRAL_VIX, &mut degraded);

    let vix9d = source
        .history(&cfg.vix9d_symbol, ChartRange::Recent5d)
        .await
        .and_then(|bars| last_close(&bars, &cfg.vix9d_symbol));
    let vix9d = fallback(Source::Vix9d, vix9d, vix, &mut degraded);

    let vix3m = source
        .history(&cfg.vix3m_symbol, ChartRange::Recent5d)
        .await
        .and_then(|bars| last_close(&bars, &cfg.vix3m_symbol));
    let vix3m = fallback(Source::Vix3m, vix3m, vix, &mut degraded);

    let dxy = source
        .history(&cfg.dxy_symbol, ChartRange::Recent5d)
        .await
        .and_then(|bars| two_point(&bars, last_pct_change));
    let dxy_change = fallback(Source::Dxy, dxy, 0.0, &mut degraded);

    let tnx = source
        .history(&cfg.tnx_symbol, ChartRange::Recent5d)
        .await
        .and_then(|bars| two_point(&bars, last_change_bps));
    let tnx_change_bps = fallback(Source::Tnx, tnx, 0.0, &mut degraded);

    let breadth_50 = fallback(Source::Breadth, source.breadth().await, NEUTRAL_BREADTH, &mut degraded);

    let high_impact_event = if cfg.event_policy.is_enabled() {
        let event = source
            .calendar()
            .await
            .map(|events| high_impact_on(&events, today, cfg.tz).map(|e| e.title.clone()));
        fallback(Source::Calendar, event, None, &mut degraded)
    } else {
        None
    };

    Ok(MarketSnapshot {
        current_price,
        sma200,
        weekly_return,
        overnight_pct,
        vix,
        vix9d,
        vix3m,
        dxy_change,
        tnx_change_bps,
        breadth_50,
        high_impact_event,
        degraded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(d: u32, close: f64) -> Bar {
        Bar { date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(), close }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    }

    #[test]
    fn test_fallback_passes_values_through() {
        let mut degraded = Vec::new();
        let v = fallback(Source::Breadth, Ok(64.0), NEUTRAL_BREADTH, &mut degraded);
        assert_eq!(v, 64.0);
        assert!(degraded.is_empty());
    }

    #[test]
    fn test_fallback_uses_default_and_records_source() {
        let mut degraded = Vec::new();
        let v = fallback(
            Source::Futures,
            Err(FetchError::AnchorNotFound("last_price")),
            0.0,
            &mut degraded,
        );
        assert_eq!(v, 0.0);
        assert_eq!(degraded, vec![Source::Futures]);
    }

    #[test]
    fn test_weekly_return_last_two() {
        let bars = vec![bar(4, 100.0), bar(11, 98.0), bar(18, 100.94)];
        let r = weekly_return(&bars, today()).unwrap();
        assert!((r - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_return_ignores_future_bar() {
        let bars = vec![bar(4, 100.0), bar(11, 102.0), bar(25, 50.0)];
        let r = weekly_return(&bars, today()).unwrap();
        assert!((r - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_return_short_series() {
        let err = weekly_return(&[bar(11, 100.0)], today()).unwrap_err();
        assert!(matches!(err, FetchError::InsufficientHistory { need: 2, have: 1 }));
        assert!(weekly_return(&[], today()).is_err());
    }

    #[test]
    fn test_neutral_snapshot_term_structure_is_flat() {
        let snap = MarketSnapshot::neutral(100.0);
        assert_eq!(snap.vix9d, snap.vix3m);
        assert_eq!(snap.sma200, snap.current_price);
    }

    #[test]
    fn test_source_names_unique() {
        use std::collections::HashSet;
        let all = [
            Source::Sma200,
            Source::Weekly,
            Source::Futures,
            Source::Vix,
            Source::Vix9d,
            Source::Vix3m,
            Source::Dxy,
            Source::Tnx,
            Source::Breadth,
            Source::Calendar,
        ];
        let names: HashSet<_> = all.iter().map(Source::as_str).collect();
        assert_eq!(names.len(), all.len());
    }
}
