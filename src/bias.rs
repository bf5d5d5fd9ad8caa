//! Score → label mapping and the high-impact-event override.

use std::fmt;

use crate::config::EventPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bias {
    StrongBearish,
    Bearish,
    Neutral,
    Bullish,
    StrongBullish,
}

impl Bias {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bias::StrongBullish => "STRONG BULLISH",
            Bias::Bullish => "BULLISH",
            Bias::Neutral => "NEUTRAL",
            Bias::Bearish => "BEARISH",
            Bias::StrongBearish => "STRONG BEARISH",
        }
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds are checked high to low and cover every integer.
pub fn classify(score: i8) -> Bias {
    if score >= 4 {
        Bias::StrongBullish
    } else if score >= 2 {
        Bias::Bullish
    } else if score > -2 {
        Bias::Neutral
    } else if score > -4 {
        Bias::Bearish
    } else {
        Bias::StrongBearish
    }
}

/// Final label for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Scored(Bias),
    /// Forced NEUTRAL because of a scheduled release; holds the event title
    EventOverride { event: String, scored: Bias },
}

impl Verdict {
    pub fn label(&self) -> String {
        match self {
            Verdict::Scored(bias) => bias.to_string(),
            Verdict::EventOverride { .. } => format!("{} (High-impact event today)", Bias::Neutral),
        }
    }

    /// The bias the score alone would have produced.
    pub fn scored(&self) -> Bias {
        match self {
            Verdict::Scored(bias) | Verdict::EventOverride { scored: bias, .. } => *bias,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Verdict::EventOverride { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

pub fn decide(score: i8, event: Option<&str>, policy: EventPolicy) -> Verdict {
    let scored = classify(score);
    match (policy, event) {
        (EventPolicy::ForceNeutral, Some(title)) => Verdict::EventOverride {
            event: title.to_string(),
            scored,
        },
        _ => Verdict::Scored(scored),
    }
}
