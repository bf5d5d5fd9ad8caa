//! The six daily bias signals.
//!
//! Each signal is a pure function of snapshot fields and votes exactly one of
//! -1, 0 or +1. The score is their unweighted sum.

use crate::acquire::MarketSnapshot;
use crate::logging::log_signal;

pub const WEEKLY_MOMENTUM_PCT: f64 = 2.0;
pub const OVERNIGHT_GAP_PCT: f64 = 0.3;
pub const VIX_LOW: f64 = 20.0;
pub const VIX_HIGH: f64 = 25.0;
pub const BREADTH_STRONG: f64 = 60.0;
pub const BREADTH_WEAK: f64 = 40.0;

pub const MAX_SCORE: i8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Bearish = -1,
    Neutral = 0,
    Bullish = 1,
}

impl Direction {
    pub fn value(self) -> i8 {
        self as i8
    }
}

/// One signal's vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub direction: Direction,
    /// Name for logging
    pub source: &'static str,
}

impl Signal {
    pub fn bullish(source: &'static str) -> Self {
        Self { direction: Direction::Bullish, source }
    }

    pub fn bearish(source: &'static str) -> Self {
        Self { direction: Direction::Bearish, source }
    }

    pub fn neutral(source: &'static str) -> Self {
        Self { direction: Direction::Neutral, source }
    }

    pub fn value(&self) -> i8 {
        self.direction.value()
    }
}

/// Ordering of short-dated vs three-month implied volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermStructure {
    Contango,
    Backwardation,
    /// Equal levels, which is also what a missing 9d/3m series collapses to
    Flat,
}

impl TermStructure {
    pub fn of(vix9d: f64, vix3m: f64) -> Self {
        if vix9d < vix3m {
            TermStructure::Contango
        } else if vix9d > vix3m {
            TermStructure::Backwardation
        } else {
            TermStructure::Flat
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TermStructure::Contango => "contango",
            TermStructure::Backwardation => "backwardation",
            TermStructure::Flat => "flat",
        }
    }
}

// =============================================================================
// Signals
// =============================================================================

/// Long-term trend: always directional. Equality counts as below.
pub fn trend_signal(price: f64, sma200: f64) -> Signal {
    if price > sma200 {
        Signal::bullish("trend")
    } else {
        Signal::bearish("trend")
    }
}

pub fn weekly_momentum_signal(weekly_return: f64) -> Signal {
    if weekly_return >= WEEKLY_MOMENTUM_PCT {
        Signal::bullish("weekly_momentum")
    } else if weekly_return <= -WEEKLY_MOMENTUM_PCT {
        Signal::bearish("weekly_momentum")
    } else {
        Signal::neutral("weekly_momentum")
    }
}

pub fn overnight_signal(overnight_pct: f64) -> Signal {
    if overnight_pct >= OVERNIGHT_GAP_PCT {
        Signal::bullish("overnight")
    } else if overnight_pct <= -OVERNIGHT_GAP_PCT {
        Signal::bearish("overnight")
    } else {
        Signal::neutral("overnight")
    }
}

/// Low fear in contango is bullish; high fear or backwardation is bearish.
/// The bullish test runs first.
pub fn volatility_signal(vix: f64, vix9d: f64, vix3m: f64) -> Signal {
    let curve = TermStructure::of(vix9d, vix3m);
    if vix < VIX_LOW && curve == TermStructure::Contango {
        Signal::bullish("volatility")
    } else if vix > VIX_HIGH || curve == TermStructure::Backwardation {
        Signal::bearish("volatility")
    } else {
        Signal::neutral("volatility")
    }
}

/// Dollar and 10y yield falling together is bullish, rising together bearish.
/// Mixed moves are neutral.
pub fn dollar_yields_signal(dxy_change: f64, tnx_change_bps: f64) -> Signal {
    if dxy_change < 0.0 && tnx_change_bps < 0.0 {
        Signal::bullish("dollar_yields")
    } else if dxy_change > 0.0 && tnx_change_bps > 0.0 {
        Signal::bearish("dollar_yields")
    } else {
        Signal::neutral("dollar_yields")
    }
}

pub fn breadth_signal(breadth_50: f64) -> Signal {
    if breadth_50 > BREADTH_STRONG {
        Signal::bullish("breadth")
    } else if breadth_50 < BREADTH_WEAK {
        Signal::bearish("breadth")
    } else {
        Signal::neutral("breadth")
    }
}

// =============================================================================
// Scorecard
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scorecard {
    pub trend: Signal,
    pub weekly_momentum: Signal,
    pub overnight: Signal,
    pub volatility: Signal,
    pub dollar_yields: Signal,
    pub breadth: Signal,
}

impl Scorecard {
    pub fn signals(&self) -> [Signal; 6] {
        [
            self.trend,
            self.weekly_momentum,
            self.overnight,
            self.volatility,
            self.dollar_yields,
            self.breadth,
        ]
    }

    /// Sum of all votes, in `-MAX_SCORE..=MAX_SCORE`.
    pub fn total(&self) -> i8 {
        self.signals().iter().map(Signal::value).sum()
    }
}

/// Evaluate all six signals against a snapshot.
pub fn score(snap: &MarketSnapshot) -> Scorecard {
    let card = Scorecard {
        trend: trend_signal(snap.current_price, snap.sma200),
        weekly_momentum: weekly_momentum_signal(snap.weekly_return),
        overnight: overnight_signal(snap.overnight_pct),
        volatility: volatility_signal(snap.vix, snap.vix9d, snap.vix3m),
        dollar_yields: dollar_yields_signal(snap.dxy_change, snap.tnx_change_bps),
        breadth: breadth_signal(snap.breadth_50),
    };

    let readings = [
        snap.current_price - snap.sma200,
        snap.weekly_return,
        snap.overnight_pct,
        snap.vix,
        snap.dxy_change,
        snap.breadth_50,
    ];
    for (signal, reading) in card.signals().iter().zip(readings) {
        log_signal(signal.source, signal.value(), reading);
    }

    card
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_never_neutral() {
        assert_eq!(trend_signal(101.0, 100.0).value(), 1);
        assert_eq!(trend_signal(99.0, 100.0).value(), -1);
        assert_eq!(trend_signal(100.0, 100.0).value(), -1);
    }

    #[test]
    fn test_weekly_momentum_boundaries() {
        assert_eq!(weekly_momentum_signal(2.0).value(), 1);
        assert_eq!(weekly_momentum_signal(1.99).value(), 0);
        assert_eq!(weekly_momentum_signal(0.0).value(), 0);
        assert_eq!(weekly_momentum_signal(-1.99).value(), 0);
        assert_eq!(weekly_momentum_signal(-2.0).value(), -1);
    }

    #[test]
    fn test_overnight_boundaries() {
        assert_eq!(overnight_signal(0.3).value(), 1);
        assert_eq!(overnight_signal(0.29).value(), 0);
        assert_eq!(overnight_signal(-0.29).value(), 0);
        assert_eq!(overnight_signal(-0.3).value(), -1);
    }

    #[test]
    fn test_volatility_regimes() {
        // low fear, contango
        assert_eq!(volatility_signal(15.0, 12.0, 18.0).value(), 1);
        // low fear but backwardation
        assert_eq!(volatility_signal(15.0, 19.0, 17.0).value(), -1);
        // high fear even in contango
        assert_eq!(volatility_signal(30.0, 25.0, 28.0).value(), -1);
        // middle band, contango
        assert_eq!(volatility_signal(22.0, 20.0, 23.0).value(), 0);
        // boundaries are exclusive
        assert_eq!(volatility_signal(20.0, 18.0, 21.0).value(), 0);
        assert_eq!(volatility_signal(25.0, 24.0, 26.0).value(), 0);
    }

    #[test]
    fn test_volatility_flat_curve_is_neutral_in_band() {
        // Missing term structure collapses to vix9d == vix3m == vix
        for vix in [12.0, 20.0, 22.5, 25.0] {
            assert_eq!(volatility_signal(vix, vix, vix).value(), 0, "vix {}", vix);
        }
        // High fear still bearish on its own
        assert_eq!(volatility_signal(31.0, 31.0, 31.0).value(), -1);
    }

    #[test]
    fn test_dollar_yields_mixed_is_neutral() {
        assert_eq!(dollar_yields_signal(-0.1, -2.0).value(), 1);
        assert_eq!(dollar_yields_signal(0.2, 3.0).value(), -1);
        assert_eq!(dollar_yields_signal(-0.1, 3.0).value(), 0);
        assert_eq!(dollar_yields_signal(0.2, -3.0).value(), 0);
        assert_eq!(dollar_yields_signal(0.0, -3.0).value(), 0);
        assert_eq!(dollar_yields_signal(0.0, 0.0).value(), 0);
    }

    #[test]
    fn test_breadth_boundaries() {
        assert_eq!(breadth_signal(60.1).value(), 1);
        assert_eq!(breadth_signal(60.0).value(), 0);
        assert_eq!(breadth_signal(40.0).value(), 0);
        assert_eq!(breadth_signal(39.9).value(), -1);
    }

    #[test]
    fn test_term_structure() {
        assert_eq!(TermStructure::of(12.0, 18.0), TermStructure::Contango);
        assert_eq!(TermStructure::of(18.0, 12.0), TermStructure::Backwardation);
        assert_eq!(TermStructure::of(15.0, 15.0), TermStructure::Flat);
    }

    #[test]
    fn test_total_stays_in_range() {
        let values = [-50.0, -2.0, -0.3, 0.0, 0.3, 2.0, 50.0];
        for &a in &values {
            for &b in &values {
                let mut snap = MarketSnapshot::neutral(100.0);
                snap.sma200 = 100.0 - a;
                snap.weekly_return = a;
                snap.overnight_pct = b;
                snap.vix = 22.5 + a;
                snap.vix9d = 20.0 + b;
                snap.vix3m = 20.0;
                snap.dxy_change = a;
                snap.tnx_change_bps = b;
                snap.breadth_50 = 50.0 + a;
                let card = score(&snap);
                for s in card.signals() {
                    assert!((-1..=1).contains(&s.value()));
                }
                assert!((-MAX_SCORE..=MAX_SCORE).contains(&card.total()));
            }
        }
    }
}
