//! Price-series arithmetic used to build the snapshot.
//!
//! Everything here is pure and works on plain close slices, oldest first.

use std::collections::VecDeque;

pub const SMA_LONG: usize = 200;

/// Simple moving average with fixed window
#[derive(Debug, Clone)]
pub struct Sma {
    window: VecDeque<f64>,
    period: usize,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(period),
            period,
            sum: 0.0,
        }
    }

    pub fn update(&mut self, price: f64) -> f64 {
        self.sum += price;
        self.window.push_back(price);
        if self.window.len() > self.period {
            self.sum -= self.window.pop_front().unwrap_or(0.0);
        }
        self.get()
    }

    pub fn get(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.sum / self.window.len() as f64
        }
    }

    pub fn is_ready(&self) -> bool {
        self.window.len() >= self.period
    }
}

/// Full-window SMA over the most recent `period` closes, `None` while warming up.
pub fn sma_last(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }
    let mut sma = Sma::new(period);
    for &c in &closes[closes.len() - period..] {
        sma.update(c);
    }
    sma.is_ready().then(|| sma.get())
}

/// Percent change from `prev` to `curr`; `None` when `prev` is not a usable base.
pub fn pct_change(prev: f64, curr: f64) -> Option<f64> {
    if prev == 0.0 || !prev.is_finite() || !curr.is_finite() {
        return None;
    }
    Some((curr / prev - 1.0) * 100.0)
}

/// Last two values of a series as `(previous, latest)`.
pub fn last_pair(values: &[f64]) -> Option<(f64, f64)> {
    match values {
        [.., prev, last] => Some((*prev, *last)),
        _ => None,
    }
}

/// Day-over-day percent change of the last two points.
pub fn last_pct_change(values: &[f64]) -> Option<f64> {
    last_pair(values).and_then(|(p, c)| pct_change(p, c))
}

/// Day-over-day change in basis points for a series quoted in percent (e.g. ^TNX).
pub fn last_change_bps(values: &[f64]) -> Option<f64> {
    last_pair(values).map(|(p, c)| (c - p) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let mut sma = Sma::new(5);
        for i in 1..=5 {
            sma.update(i as f64);
        }
        assert_eq!(sma.get(), 3.0);
        assert!(sma.is_ready());
    }

    #[test]
    fn test_sma_last_uses_tail_only() {
        let mut closes: Vec<f64> = vec![1000.0; 50];
        closes.extend(std::iter::repeat(10.0).take(SMA_LONG));
        assert_eq!(sma_last(&closes, SMA_LONG), Some(10.0));
    }

    #[test]
    fn test_sma_last_short_history() {
        let closes = vec![100.0; SMA_LONG - 1];
        assert_eq!(sma_last(&closes, SMA_LONG), None);
        assert_eq!(sma_last(&[], SMA_LONG), None);
    }

    #[test]
    fn test_pct_change() {
        let up = pct_change(100.0, 103.0).unwrap();
        assert!((up - 3.0).abs() < 1e-9);
        assert!(pct_change(0.0, 5.0).is_none());
        assert!(pct_change(f64::NAN, 5.0).is_none());
    }

    #[test]
    fn test_last_pair_and_changes() {
        assert_eq!(last_pair(&[1.0]), None);
        assert_eq!(last_pair(&[1.0, 2.0, 3.0]), Some((2.0, 3.0)));

        let dxy = last_pct_change(&[104.0, 103.896]).unwrap();
        assert!((dxy + 0.1).abs() < 1e-9);

        let bps = last_change_bps(&[4.25, 4.23]).unwrap();
        assert!((bps + 2.0).abs() < 1e-9);
        assert!(last_change_bps(&[4.25]).is_none());
    }
}
