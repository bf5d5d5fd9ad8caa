use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::Client;
use std::time::Duration;

use super::calendar::{parse_calendar, CalendarEvent};
use super::chart::{chart_url, parse_chart, ChartRange};
use super::{scrape, Bar, MarketData};
use crate::config::Config;
use crate::error::{FetchError, FetchResult};
use crate::logging::{log_fetch, v_str, ProfileScope};

/// Network-backed market data: chart API, two scraped pages and the calendar feed.
pub struct LiveFeed {
    client: Client,
    chart_base: String,
    futures_url: String,
    breadth_url: String,
    calendar_url: String,
    tz: Tz,
}

impl LiveFeed {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(cfg.http_timeout_secs))
                .user_agent(cfg.user_agent.clone())
                .build()
                .unwrap_or_else(|_| Client::new()),
            chart_base: cfg.chart_base.clone(),
            futures_url: cfg.futures_url.clone(),
            breadth_url: cfg.breadth_url.clone(),
            calendar_url: cfg.calendar_url.clone(),
            tz: cfg.tz,
        }
    }

    async fn get_text(&self, url: &str) -> FetchResult<String> {
        let _scope = ProfileScope::with_context("http_get", &[("url", v_str(url))]);
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl MarketData for LiveFeed {
    async fn history(&self, symbol: &str, range: ChartRange) -> FetchResult<Vec<Bar>> {
        let url = chart_url(&self.chart_base, symbol, range)?;
        let body = self.get_text(url.as_str()).await?;
        let bars = parse_chart(&body, self.tz)?;
        log_fetch(symbol, url.as_str(), bars.len());
        Ok(bars)
    }

    async fn futures_quote(&self) -> FetchResult<f64> {
        let html = self.get_text(&self.futures_url).await?;
        let price = scrape::futures_price(&html)?;
        log_fetch("futures", &self.futures_url, 1);
        Ok(price)
    }

    async fn breadth(&self) -> FetchResult<f64> {
        let html = self.get_text(&self.breadth_url).await?;
        let pct = scrape::breadth_pct(&html)?;
        log_fetch("breadth", &self.breadth_url, 1);
        Ok(pct)
    }

    async fn calendar(&self) -> FetchResult<Vec<CalendarEvent>> {
        let body = self.get_text(&self.calendar_url).await?;
        let events = parse_calendar(&body)?;
        log_fetch("calendar", &self.calendar_url, events.len());
        Ok(events)
    }
}
