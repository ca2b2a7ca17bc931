//! Breakout signal: today's price against the trailing high/low.
//!
//! The trailing window excludes today. Returns exactly one of `-1`, `0`, `1`.

pub fn breakout_signal(prices: &[f64], days: usize, threshold: f64) -> i8 {
    if days == 0 || prices.len() < days + 1 {
        return 0;
    }

    let n = prices.len();
    let trailing = &prices[n - days - 1..n - 1];
    let high = trailing.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = trailing.iter().copied().fold(f64::INFINITY, f64::min);
    let current = prices[n - 1];

    if current > high * (1.0 + threshold) {
        1
    } else if current < low * (1.0 - threshold) {
        -1
    } else {
        0
    }
}
