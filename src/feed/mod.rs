//! Market data sources.
//!
//! `MarketData` is the seam between the pipeline and the network: the live
//! implementation talks to the chart API and scrapes two pages, tests plug in
//! a canned implementation.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::FetchResult;

pub mod calendar;
pub mod chart;
pub mod live;
pub mod scrape;

pub use calendar::CalendarEvent;
pub use chart::ChartRange;
pub use live::LiveFeed;

/// One close of a daily or weekly series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
}

pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

#[async_trait]
pub trait MarketData: Send + Sync {
    /// Close history for `symbol`, oldest first.
    async fn history(&self, symbol: &str, range: ChartRange) -> FetchResult<Vec<Bar>>;
    /// Latest index futures quote.
    async fn futures_quote(&self) -> FetchResult<f64>;
    /// Percent of index members above their 50-day average.
    async fn breadth(&self) -> FetchResult<f64>;
    /// This week's scheduled economic releases.
    async fn calendar(&self) -> FetchResult<Vec<CalendarEvent>>;
}
