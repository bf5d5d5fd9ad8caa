//! Fixed-layout text report, printed and written to disk.

use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;

use crate::acquire::MarketSnapshot;
use crate::bias::Verdict;
use crate::logging::log_report_written;
use crate::signals::{Direction, Scorecard, TermStructure, MAX_SCORE};

pub fn render(
    today: NaiveDate,
    snap: &MarketSnapshot,
    card: &Scorecard,
    verdict: &Verdict,
    show_event_line: bool,
) -> String {
    let trend = match card.trend.direction {
        Direction::Bullish => "Above (+1)",
        _ => "Below (-1)",
    };
    let curve = TermStructure::of(snap.vix9d, snap.vix3m);

    // Writing into a String cannot fail.
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "=== DAILY BIAS — {} ===", today.format("%A, %B %d, %Y"));
    let _ = writeln!(out, "Score       : {}/{}", card.total(), MAX_SCORE);
    let _ = writeln!(out, "Trend (200SMA) : {}", trend);
    let _ = writeln!(out, "Weekly mom  : {:+5.2}%", snap.weekly_return);
    let _ = writeln!(out, "Overnight   : {:+5.2}%", snap.overnight_pct);
    let _ = writeln!(out, "VIX regime  : {:.1} ({})", snap.vix, curve.as_str());
    let _ = writeln!(
        out,
        "DXY + 10Y   : {:+.2}% / {:+.1}bps",
        snap.dxy_change, snap.tnx_change_bps
    );
    let _ = writeln!(out, "Breadth 50d : {:.1}%", snap.breadth_50);
    if show_event_line {
        let event = match verdict {
            Verdict::EventOverride { event, .. } => format!("yes ({})", event),
            Verdict::Scored(_) => "no".to_string(),
        };
        let _ = writeln!(out, "High-impact event today: {}", event);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, ">>> FINAL BIAS: {} <<<", verdict.label());
    out
}

/// Print the report and overwrite `path` with it. Last run wins.
pub fn publish(path: &Path, text: &str) -> std::io::Result<()> {
    print!("{}", text);
    std::fs::write(path, text)?;
    log_report_written(&path.to_string_lossy(), text.len());
    Ok(())
}
