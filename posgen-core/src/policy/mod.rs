//! Position policies — map a price history to one decision per instrument.
//!
//! Two policies share the signal library:
//! - `BlendPolicy`: signal-priority blend of breakout, momentum and mean reversion,
//!   stateless from day to day.
//! - `TrendReversionPolicy`: trend-gated mean reversion that tracks entry days and
//!   force-closes positions after a maximum holding period.

pub mod blend;
pub mod factory;
pub mod rules;
pub mod trend_reversion;

pub use blend::BlendPolicy;
pub use factory::create_policy;
pub use rules::{resolve_signal, SignalInputs, PRIORITY};
pub use trend_reversion::TrendReversionPolicy;

use crate::domain::{InstrumentDecision, PriceHistory};
use crate::state::GeneratorState;

/// A strategy the generator can run.
///
/// # Contract
/// - Called only once `history.num_days() >= min_history()`.
/// - Returns exactly one decision per instrument, in instrument order.
/// - Every returned position is within `[-limit, limit]` for that instrument.
/// - `state.positions` holds the previous day's vector on entry; the generator
///   overwrites it with the returned positions afterwards. Policies may update
///   `state.entry_days`.
pub trait PositionPolicy: Send + Sync {
    /// Human-readable name (e.g., "blend").
    fn name(&self) -> &str;

    /// Days of history needed before the policy produces anything but zeros.
    fn min_history(&self) -> usize;

    fn evaluate(
        &self,
        history: &PriceHistory,
        state: &mut GeneratorState,
    ) -> Vec<InstrumentDecision>;
}
