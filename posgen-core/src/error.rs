//! Errors surfaced to callers of the position generator.
//!
//! Only contract violations are errors. Short histories, degenerate arithmetic
//! and quality-filter rejections are handled inside the policies.

use crate::config::ConfigError;
use crate::domain::HistoryError;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("invalid price history: {0}")]
    History(#[from] HistoryError),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("expected {expected} instruments, got {actual}")]
    InstrumentCountMismatch { expected: usize, actual: usize },
    #[error("history rewound: got day {day} after day {last_day}")]
    HistoryRewound { last_day: usize, day: usize },
}
