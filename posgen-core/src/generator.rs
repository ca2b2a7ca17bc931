//! Position generator — the stateful entry point called once per trading day.
//!
//! Owns the policy and its cross-call state. Each call receives the full price
//! history up to "today" and returns one integer target position per instrument.
//!
//! Calling contract:
//! - the instrument count is fixed at construction;
//! - each call supplies the same or a longer history than the previous one;
//! - a call with the same number of days as the previous call is a pure read that
//!   returns the previous result without touching state;
//! - a shorter history is rejected, since the state already reflects later days.

use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::domain::{Decision, InstrumentDecision, PriceHistory, StepReport};
use crate::error::GeneratorError;
use crate::policy::{create_policy, PositionPolicy};
use crate::state::GeneratorState;

pub struct PositionGenerator {
    policy: Box<dyn PositionPolicy>,
    state: GeneratorState,
    last_report: Option<StepReport>,
}

impl std::fmt::Debug for PositionGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionGenerator")
            .field("policy", &self.policy.name())
            .field("state", &self.state)
            .finish()
    }
}

impl PositionGenerator {
    pub fn new(policy: Box<dyn PositionPolicy>, num_instruments: usize) -> Self {
        Self {
            policy,
            state: GeneratorState::new(num_instruments),
            last_report: None,
        }
    }

    /// Validate `config` and build the generator it describes.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        let policy = create_policy(&config.policy, &config.limits);
        Ok(Self::new(policy, config.num_instruments))
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn num_instruments(&self) -> usize {
        self.state.num_instruments()
    }

    /// The last position vector returned (all zeros before the first call).
    pub fn current_positions(&self) -> &[i64] {
        &self.state.positions
    }

    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// Forget every previous day, as after a process restart.
    pub fn reset(&mut self) {
        self.state.reset();
        self.last_report = None;
    }

    /// Compute today's positions from a raw `[instrument][day]` table.
    pub fn compute_positions(&mut self, prices: &[Vec<f64>]) -> Result<Vec<i64>, GeneratorError> {
        let history = PriceHistory::new(prices.to_vec())?;
        self.step(&history)
    }

    /// Compute today's positions.
    pub fn step(&mut self, history: &PriceHistory) -> Result<Vec<i64>, GeneratorError> {
        self.step_detailed(history).map(|report| report.positions())
    }

    /// Compute today's positions along with the reason behind each one.
    pub fn step_detailed(&mut self, history: &PriceHistory) -> Result<StepReport, GeneratorError> {
        let expected = self.num_instruments();
        if history.num_instruments() != expected {
            return Err(GeneratorError::InstrumentCountMismatch {
                expected,
                actual: history.num_instruments(),
            });
        }

        let today = history.today();
        if let Some(last) = &self.last_report {
            if today < last.day {
                return Err(GeneratorError::HistoryRewound {
                    last_day: last.day,
                    day: today,
                });
            }
            if today == last.day {
                warn!(day = today, "no new day in price history; returning previous positions");
                return Ok(last.clone());
            }
        }

        let instruments = if history.num_days() < self.policy.min_history() {
            vec![InstrumentDecision::flat(Decision::Warmup); expected]
        } else {
            self.policy.evaluate(history, &mut self.state)
        };

        let report = StepReport {
            day: today,
            policy: self.policy.name().to_string(),
            instruments,
        };
        self.state.positions = report.positions();
        self.state.day_counter = Some(today);
        self.last_report = Some(report.clone());

        debug!(
            day = today,
            policy = self.policy.name(),
            open = self.state.open_count(),
            "computed positions"
        );
        Ok(report)
    }
}
