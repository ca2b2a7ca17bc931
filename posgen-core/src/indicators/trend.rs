//! Trend classifier: short vs long simple moving average with a buffer.
//!
//! Up when `sma_short > sma_long * (1 + buffer)`, down when
//! `sma_short < sma_long * (1 - buffer)`, neutral otherwise or when the series is
//! shorter than the long period.

use serde::{Deserialize, Serialize};

use super::sma::sma;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    /// +1, -1 or 0.
    pub fn sign(self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
            Self::Neutral => 0,
        }
    }
}

pub fn classify_trend(prices: &[f64], short_period: usize, long_period: usize, buffer: f64) -> Trend {
    let (Some(short), Some(long)) = (sma(prices, short_period), sma(prices, long_period)) else {
        return Trend::Neutral;
    };

    if short > long * (1.0 + buffer) {
        Trend::Up
    } else if short < long * (1.0 - buffer) {
        Trend::Down
    } else {
        Trend::Neutral
    }
}
