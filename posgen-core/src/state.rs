//! Cross-call state owned by a position generator.

use serde::{Deserialize, Serialize};

/// Everything a generator remembers between successive days.
///
/// Lives as long as the generator; `reset()` is the only way back to the
/// initial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorState {
    /// The last position vector returned.
    pub positions: Vec<i64>,
    /// Day each open position was entered, `None` when flat.
    pub entry_days: Vec<Option<usize>>,
    /// Latest day index processed, `None` before the first call.
    pub day_counter: Option<usize>,
}

impl GeneratorState {
    pub fn new(num_instruments: usize) -> Self {
        Self {
            positions: vec![0; num_instruments],
            entry_days: vec![None; num_instruments],
            day_counter: None,
        }
    }

    pub fn num_instruments(&self) -> usize {
        self.positions.len()
    }

    pub fn reset(&mut self) {
        self.positions.iter_mut().for_each(|p| *p = 0);
        self.entry_days.iter_mut().for_each(|d| *d = None);
        self.day_counter = None;
    }

    /// Number of instruments with a non-zero position.
    pub fn open_count(&self) -> usize {
        self.positions.iter().filter(|&&p| p != 0).count()
    }
}
