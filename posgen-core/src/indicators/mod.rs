//! Signal library — pure functions over a single instrument's price series.
//!
//! Every function takes the full chronological series (last element = today) and
//! never fails: short histories and degenerate arithmetic fall back to a neutral
//! or conservative value instead of an error.

pub mod breakout;
pub mod mean_reversion;
pub mod momentum;
pub mod rsi;
pub mod sma;
pub mod trend;
pub mod volatility;

pub use breakout::breakout_signal;
pub use mean_reversion::mean_reversion_signal;
pub use momentum::momentum;
pub use rsi::{rsi, rsi_over_lookback, NEUTRAL_RSI};
pub use sma::sma;
pub use trend::{classify_trend, Trend};
pub use volatility::{log_return_stats, simple_return_volatility, ReturnStats};

/// Mean and population standard deviation of `values`.
///
/// Returns `(NaN, NaN)` for an empty slice; callers guard lengths first.
pub(crate) fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std_population() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_approx(mean, 5.0, DEFAULT_EPSILON);
        assert_approx(std, 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn mean_and_std_constant_series() {
        let (mean, std) = mean_and_std(&[3.0; 4]);
        assert_approx(mean, 3.0, DEFAULT_EPSILON);
        assert_eq!(std, 0.0);
    }
}
