//! Volatility estimators.
//!
//! - Simple-return volatility over a trailing window, with a conservative
//!   fallback when history is short (used by the blend policy's filter and sizing).
//! - Log-return statistics over a trailing window (used by trend reversion for its
//!   volatility gate and z-score).
//!
//! Both use the population standard deviation of the window's returns.

use super::mean_and_std;

/// Standard deviation of the last `days` simple returns.
///
/// Needs `days + 1` prices; with fewer (or `days == 0`) returns `fallback`, which
/// callers set high so under-history instruments are filtered or sized down.
pub fn simple_return_volatility(prices: &[f64], days: usize, fallback: f64) -> f64 {
    if days == 0 || prices.len() < days + 1 {
        return fallback;
    }

    let window = &prices[prices.len() - days - 1..];
    let returns: Vec<f64> = window.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
    mean_and_std(&returns).1
}

/// Summary of the trailing log returns of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStats {
    pub mean: f64,
    pub volatility: f64,
    /// Today's log return (last element of the window).
    pub last: f64,
}

impl ReturnStats {
    /// Z-score of today's return within the window; 0 when volatility is 0.
    pub fn z_score(&self) -> f64 {
        if self.volatility > 0.0 {
            (self.last - self.mean) / self.volatility
        } else {
            0.0
        }
    }
}

/// Mean, volatility and latest value of the last `window` log returns.
///
/// `None` when the series holds fewer than `window + 1` prices.
pub fn log_return_stats(prices: &[f64], window: usize) -> Option<ReturnStats> {
    if window == 0 || prices.len() < window + 1 {
        return None;
    }

    let slice = &prices[prices.len() - window - 1..];
    let returns: Vec<f64> = slice.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let (mean, volatility) = mean_and_std(&returns);
    Some(ReturnStats {
        mean,
        volatility,
        last: returns[returns.len() - 1],
    })
}
