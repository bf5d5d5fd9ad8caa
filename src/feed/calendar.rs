//! Weekly economic calendar feed (JSON list of scheduled releases).

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::FetchResult;

/// Feed timestamps come either as epoch seconds or as RFC 3339 strings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum EventTime {
    Epoch(i64),
    Text(String),
}

impl EventTime {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::Epoch(secs) => Utc.timestamp_opt(*secs, 0).single(),
            EventTime::Text(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CalendarEvent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub country: String,
    pub date: EventTime,
    #[serde(default)]
    pub impact: String,
}

impl CalendarEvent {
    pub fn is_high_impact(&self) -> bool {
        self.impact.eq_ignore_ascii_case("high")
    }

    /// Calendar day of the event in the exchange's zone.
    pub fn local_date(&self, tz: Tz) -> Option<NaiveDate> {
        self.date.to_utc().map(|dt| dt.with_timezone(&tz).date_naive())
    }
}

pub fn parse_calendar(body: &str) -> FetchResult<Vec<CalendarEvent>> {
    Ok(serde_json::from_str(body)?)
}

/// First high-impact event scheduled on `today`, if any.
pub fn high_impact_on<'a>(
    events: &'a [CalendarEvent],
    today: NaiveDate,
    tz: Tz,
) -> Option<&'a CalendarEvent> {
    events
        .iter()
        .find(|e| e.is_high_impact() && e.local_date(tz) == Some(today))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NY: Tz = chrono_tz::America::New_York;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_mixed_date_formats() {
        let body = r#"[
            {"title":"CPI m/m","country":"USD","date":"2024-01-11T08:30:00-05:00","impact":"High","forecast":"0.2%","previous":"0.1%"},
            {"title":"Bank Holiday","country":"JPY","date":1704931200,"impact":"Holiday"}
        ]"#;
        let events = parse_calendar(body).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_high_impact());
        assert_eq!(events[0].local_date(NY), Some(day(2024, 1, 11)));
        assert!(matches!(events[1].date, EventTime::Epoch(_)));
        assert!(!events[1].is_high_impact());
    }

    #[test]
    fn test_high_impact_today_only() {
        let body = r#"[
            {"title":"Retail Sales","country":"USD","date":"2024-01-10T08:30:00-05:00","impact":"High"},
            {"title":"Crude Oil Inventories","country":"USD","date":"2024-01-11T10:30:00-05:00","impact":"Medium"},
            {"title":"CPI m/m","country":"USD","date":"2024-01-11T08:30:00-05:00","impact":"high"}
        ]"#;
        let events = parse_calendar(body).unwrap();
        let hit = high_impact_on(&events, day(2024, 1, 11), NY).unwrap();
        assert_eq!(hit.title, "CPI m/m");
        assert!(high_impact_on(&events, day(2024, 1, 12), NY).is_none());
    }

    #[test]
    fn test_late_evening_event_keeps_local_date() {
        // 21:00 New York is already the next day in UTC
        let body = r#"[{"title":"FOMC Minutes","date":"2024-01-11T21:00:00-05:00","impact":"High"}]"#;
        let events = parse_calendar(body).unwrap();
        assert!(high_impact_on(&events, day(2024, 1, 11), NY).is_some());
    }

    #[test]
    fn test_unparseable_text_date_never_matches() {
        let body = r#"[{"title":"NFP","date":"tomorrow","impact":"High"}]"#;
        let events = parse_calendar(body).unwrap();
        assert!(high_impact_on(&events, day(2024, 1, 11), NY).is_none());
    }
}
