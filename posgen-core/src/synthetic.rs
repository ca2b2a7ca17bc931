//! Synthetic price series for demos, tests and benchmarks.
//!
//! Deterministic: the same seed always produces the same matrix.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{HistoryError, PriceHistory};

/// Independent random walks, one per instrument.
///
/// Each instrument starts between 10 and 100 with its own small drift, and moves
/// by up to ±2% a day.
pub fn random_walk(
    num_instruments: usize,
    num_days: usize,
    seed: u64,
) -> Result<PriceHistory, HistoryError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = (0..num_instruments)
        .map(|_| {
            let mut price: f64 = rng.gen_range(10.0..100.0);
            let drift: f64 = rng.gen_range(-0.0005..0.0005);
            (0..num_days)
                .map(|day| {
                    if day > 0 {
                        price *= 1.0 + drift + rng.gen_range(-0.02..0.02);
                    }
                    price
                })
                .collect()
        })
        .collect();
    PriceHistory::new(rows)
}

/// `start × (1 + daily_return)^day` for `num_days` days.
pub fn geometric_trend(start: f64, daily_return: f64, num_days: usize) -> Vec<f64> {
    with_pullbacks(start, daily_return, 0.0, 0, num_days)
}

/// A steady trend interrupted by a `pullback` return every `every` days.
///
/// `every == 0` disables pullbacks.
pub fn with_pullbacks(
    start: f64,
    daily_return: f64,
    pullback: f64,
    every: usize,
    num_days: usize,
) -> Vec<f64> {
    let mut prices = Vec::with_capacity(num_days);
    let mut price = start;
    for day in 0..num_days {
        if day > 0 {
            let step = if every > 0 && day % every == 0 {
                pullback
            } else {
                daily_return
            };
            price *= 1.0 + step;
        }
        prices.push(price);
    }
    prices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_walk_is_deterministic() {
        let a = random_walk(5, 100, 42).unwrap();
        let b = random_walk(5, 100, 42).unwrap();
        let c = random_walk(5, 100, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.num_instruments(), 5);
        assert_eq!(a.num_days(), 100);
    }

    #[test]
    fn random_walk_moves_at_most_two_percent_plus_drift() {
        let history = random_walk(3, 200, 7).unwrap();
        for i in 0..3 {
            for w in history.series(i).windows(2) {
                let change = (w[1] / w[0] - 1.0).abs();
                assert!(change < 0.0206, "daily change {change}");
            }
        }
    }

    #[test]
    fn geometric_trend_compounds() {
        let prices = geometric_trend(100.0, 0.01, 3);
        assert_eq!(prices.len(), 3);
        assert!((prices[2] - 102.01).abs() < 1e-9);
    }

    #[test]
    fn pullbacks_on_schedule() {
        let prices = with_pullbacks(100.0, 0.005, -0.015, 7, 15);
        for day in 1..15 {
            let went_down = prices[day] < prices[day - 1];
            assert_eq!(went_down, day % 7 == 0, "day {day}");
        }
    }
}
