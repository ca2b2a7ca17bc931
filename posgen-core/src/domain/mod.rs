//! Domain types: the price table, position arithmetic, and decision records.

pub mod decision;
pub mod history;
pub mod position;

pub use decision::{Decision, InstrumentDecision, SignalRule, StepReport};
pub use history::{HistoryError, PriceHistory};
pub use position::{clamp_position, decay_position, position_limit, to_position};
