use chrono_tz::Tz;

/// Whether a same-day high-impact calendar event forces the verdict to NEUTRAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPolicy {
    ForceNeutral,
    Ignore,
}

impl EventPolicy {
    pub fn is_enabled(&self) -> bool {
        matches!(self, EventPolicy::ForceNeutral)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub symbol: String,
    pub vix_symbol: String,
    pub vix9d_symbol: String,
    pub vix3m_symbol: String,
    pub dxy_symbol: String,
    pub tnx_symbol: String,
    pub chart_base: String,
    pub futures_url: String,
    pub breadth_url: String,
    pub calendar_url: String,
    pub user_agent: String,
    pub http_timeout_secs: u64,
    pub output_path: String,
    pub event_policy: EventPolicy,
    /// Exchange-local zone that defines "today"
    pub tz: Tz,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            symbol: env_or("BIAS_SYMBOL", "SPY"),
            vix_symbol: env_or("BIAS_VIX_SYMBOL", "^VIX"),
            vix9d_symbol: env_or("BIAS_VIX9D_SYMBOL", "^VIX9D"),
            vix3m_symbol: env_or("BIAS_VIX3M_SYMBOL", "^VIX3M"),
            dxy_symbol: env_or("BIAS_DXY_SYMBOL", "DX-Y.NYB"),
            tnx_symbol: env_or("BIAS_TNX_SYMBOL", "^TNX"),
            chart_base: env_or("BIAS_CHART_BASE", "https://query1.finance.yahoo.com"),
            futures_url: env_or(
                "BIAS_FUTURES_URL",
                "https://www.investing.com/indices/us-spx-500-futures",
            ),
            breadth_url: env_or(
                "BIAS_BREADTH_URL",
                "https://www.barchart.com/stocks/quotes/SPX/technical-analysis",
            ),
            calendar_url: env_or(
                "BIAS_CALENDAR_URL",
                "https://nfs.faireconomy.media/ff_calendar_thisweek.json",
            ),
            user_agent: env_or("BIAS_USER_AGENT", "Mozilla/5.0"),
            http_timeout_secs: std::env::var("BIAS_HTTP_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(10),
            output_path: env_or("BIAS_OUTPUT", "latest_bias.txt"),
            event_policy: match std::env::var("BIAS_EVENT_OVERRIDE").ok().and_then(|v| parse_flag(&v)) {
                Some(false) => EventPolicy::Ignore,
                _ => EventPolicy::ForceNeutral,
            },
            tz: std::env::var("BIAS_TZ")
                .ok()
                .and_then(|v| v.parse::<Tz>().ok())
                .unwrap_or(chrono_tz::America::New_York),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
