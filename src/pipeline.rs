//! acquire → score → decide → render, without touching stdout or disk.

use chrono::NaiveDate;

use crate::acquire::{acquire, MarketSnapshot};
use crate::bias::{decide, Verdict};
use crate::config::Config;
use crate::error::AcquireError;
use crate::feed::MarketData;
use crate::logging::log_verdict;
use crate::report::render;
use crate::signals::{score, Scorecard};

#[derive(Debug, Clone)]
pub struct DailyBias {
    pub date: NaiveDate,
    pub snapshot: MarketSnapshot,
    pub scorecard: Scorecard,
    pub verdict: Verdict,
    pub report: String,
}

pub async fn run(
    source: &dyn MarketData,
    cfg: &Config,
    today: NaiveDate,
) -> Result<DailyBias, AcquireError> {
    let snapshot = acquire(source, cfg, today).await?;
    let scorecard = score(&snapshot);
    let verdict = decide(
        scorecard.total(),
        snapshot.high_impact_event.as_deref(),
        cfg.event_policy,
    );
    log_verdict(scorecard.total(), &verdict.label(), &snapshot.degraded_names());

    let report = render(
        today,
        &snapshot,
        &scorecard,
        &verdict,
        cfg.event_policy.is_enabled(),
    );

    Ok(DailyBias {
        date: today,
        snapshot,
        scorecard,
        verdict,
        report,
    })
}
