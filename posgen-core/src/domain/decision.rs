//! Per-instrument decisions — why a position came out the way it did.

use serde::{Deserialize, Serialize};

/// Which rule of the signal-priority blend produced the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalRule {
    Breakout,
    MomentumLong,
    MomentumShort,
    MeanReversionLong,
    MeanReversionShort,
}

/// Reason code attached to one instrument's position for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// Not enough history for the policy; every instrument is flat.
    Warmup,
    /// Today's price is below the minimum price floor.
    PriceFloor,
    /// Measured volatility is above the policy's ceiling.
    VolatilityCeiling { volatility: f64 },
    /// A blend rule fired with the given signed strength.
    Signal { rule: SignalRule, strength: f64 },
    /// No blend rule matched.
    NoSignal,
    /// Trend is neutral; the held position was decayed.
    NeutralTrendDecay,
    /// Volatility is too high; the held position was decayed.
    HighVolatilityDecay { volatility: f64 },
    /// The position reached the maximum holding period and was closed.
    HoldingPeriodExpired { entry_day: usize },
    OpenedLong { z_score: f64, rsi: f64 },
    OpenedShort { z_score: f64, rsi: f64 },
    Closed { z_score: f64, rsi: f64 },
    /// No entry or exit condition; the current position is carried over.
    Held,
}

/// One instrument's output for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentDecision {
    pub position: i64,
    pub decision: Decision,
}

impl InstrumentDecision {
    pub fn new(position: i64, decision: Decision) -> Self {
        Self { position, decision }
    }

    pub fn flat(decision: Decision) -> Self {
        Self::new(0, decision)
    }
}

/// Full output of one generator step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Index of "today" in the supplied history.
    pub day: usize,
    pub policy: String,
    pub instruments: Vec<InstrumentDecision>,
}

impl StepReport {
    /// The position vector, in instrument order.
    pub fn positions(&self) -> Vec<i64> {
        self.instruments.iter().map(|d| d.position).collect()
    }
}
