//! Momentum: relative price change over a lookback window.

/// `(price_today - price[t - days]) / price[t - days]`.
///
/// 0 when the series has fewer than `days + 1` prices.
pub fn momentum(prices: &[f64], days: usize) -> f64 {
    if days == 0 || prices.len() < days + 1 {
        return 0.0;
    }

    let n = prices.len();
    let past = prices[n - days - 1];
    (prices[n - 1] - past) / past
}
