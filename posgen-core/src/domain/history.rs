//! Price history — the `[instrument][day]` table every policy reads.
//!
//! Validated once on construction so the signal library can assume finite,
//! strictly positive prices and rectangular rows.

use serde::{Deserialize, Serialize};

/// Reasons a price table is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryError {
    #[error("price history has no instruments")]
    EmptyUniverse,
    #[error("price history has no trading days")]
    NoDays,
    #[error("instrument {instrument} has {actual} days, expected {expected}")]
    RaggedRows {
        instrument: usize,
        expected: usize,
        actual: usize,
    },
    #[error("day {day} has {actual} prices, expected {expected}")]
    RaggedDay {
        day: usize,
        expected: usize,
        actual: usize,
    },
    #[error("invalid price {price} for instrument {instrument} on day {day}")]
    InvalidPrice {
        instrument: usize,
        day: usize,
        price: f64,
    },
    #[error("cannot take a {requested}-day prefix of a {available}-day history")]
    PrefixOutOfRange { requested: usize, available: usize },
}

/// Immutable, validated price table.
///
/// Rows are instruments, columns are trading days in chronological order.
/// The last column is "today".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    rows: Vec<Vec<f64>>,
    num_days: usize,
}

impl PriceHistory {
    /// Build from instrument-major rows (`rows[instrument][day]`).
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, HistoryError> {
        let first = rows.first().ok_or(HistoryError::EmptyUniverse)?;
        let num_days = first.len();
        if num_days == 0 {
            return Err(HistoryError::NoDays);
        }

        for (instrument, row) in rows.iter().enumerate() {
            if row.len() != num_days {
                return Err(HistoryError::RaggedRows {
                    instrument,
                    expected: num_days,
                    actual: row.len(),
                });
            }
            if let Some((day, &price)) = row
                .iter()
                .enumerate()
                .find(|(_, p)| !p.is_finite() || **p <= 0.0)
            {
                return Err(HistoryError::InvalidPrice {
                    instrument,
                    day,
                    price,
                });
            }
        }

        Ok(Self { rows, num_days })
    }

    /// Build from day-major rows (`days[day][instrument]`), the layout of price files.
    pub fn from_days(days: &[Vec<f64>]) -> Result<Self, HistoryError> {
        let num_instruments = days.first().map(Vec::len).unwrap_or(0);
        if num_instruments == 0 {
            return Err(HistoryError::EmptyUniverse);
        }

        let mut rows = vec![Vec::with_capacity(days.len()); num_instruments];
        for (day, prices) in days.iter().enumerate() {
            if prices.len() != num_instruments {
                return Err(HistoryError::RaggedDay {
                    day,
                    expected: num_instruments,
                    actual: prices.len(),
                });
            }
            for (row, &price) in rows.iter_mut().zip(prices) {
                row.push(price);
            }
        }

        Self::new(rows)
    }

    pub fn num_instruments(&self) -> usize {
        self.rows.len()
    }

    pub fn num_days(&self) -> usize {
        self.num_days
    }

    /// Index of the most recent day.
    pub fn today(&self) -> usize {
        self.num_days - 1
    }

    /// Full chronological series for one instrument.
    pub fn series(&self, instrument: usize) -> &[f64] {
        &self.rows[instrument]
    }

    /// Today's price for one instrument.
    pub fn last_price(&self, instrument: usize) -> f64 {
        self.rows[instrument][self.num_days - 1]
    }

    /// Today's prices for all instruments.
    pub fn last_prices(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row[self.num_days - 1]).collect()
    }

    /// Copy of the first `days` trading days, as a driver would have seen them.
    pub fn prefix(&self, days: usize) -> Result<Self, HistoryError> {
        if days == 0 || days > self.num_days {
            return Err(HistoryError::PrefixOutOfRange {
                requested: days,
                available: self.num_days,
            });
        }
        Ok(Self {
            rows: self.rows.iter().map(|row| row[..days].to_vec()).collect(),
            num_days: days,
        })
    }
}
