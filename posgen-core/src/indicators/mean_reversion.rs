//! Mean-reversion signal: today's deviation from the trailing average.
//!
//! `(price_today - mean(prev N)) / mean(prev N)`, where the average excludes today.
//! Positive means stretched above the average (sell bias), negative below (buy bias).

pub fn mean_reversion_signal(prices: &[f64], days: usize) -> f64 {
    if days == 0 || prices.len() < days + 1 {
        return 0.0;
    }

    let n = prices.len();
    let trailing = &prices[n - days - 1..n - 1];
    let average = trailing.iter().sum::<f64>() / days as f64;
    (prices[n - 1] - average) / average
}
