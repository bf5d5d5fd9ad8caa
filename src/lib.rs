//! Daily directional bias for a broad-market index proxy.
//!
//! Six +1/0/-1 market signals are summed and thresholded into a label, which
//! is printed and written to a text file once per session.

pub mod acquire;
pub mod bias;
pub mod config;
pub mod error;
pub mod feed;
pub mod indicators;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod signals;

pub use acquire::{MarketSnapshot, Source};
pub use bias::{classify, decide, Bias, Verdict};
pub use config::{Config, EventPolicy};
pub use error::{AcquireError, FetchError};
pub use pipeline::{run, DailyBias};
pub use signals::{score, Scorecard, Signal};
