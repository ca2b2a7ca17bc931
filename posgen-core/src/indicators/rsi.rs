//! Short-period RSI over a price slice.
//!
//! Averages the gains and losses of the last `period` day-over-day changes.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Edge cases: no losses → 100 (including a flat slice); too few prices → 50.

/// Value returned when there is not enough history to measure anything.
pub const NEUTRAL_RSI: f64 = 50.0;

pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let recent = &prices[prices.len() - period - 1..];
    let (gain, loss) = recent.windows(2).fold((0.0, 0.0), |(gain, loss), w| {
        let change = w[1] - w[0];
        if change > 0.0 {
            (gain + change, loss)
        } else {
            (gain, loss - change)
        }
    });

    let avg_gain = gain / period as f64;
    let avg_loss = loss / period as f64;
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// RSI over the last `lookback` prices, or neutral when fewer are observed.
pub fn rsi_over_lookback(prices: &[f64], lookback: usize, period: usize) -> f64 {
    if prices.len() < lookback {
        return NEUTRAL_RSI;
    }
    rsi(&prices[prices.len() - lookback..], period)
}
