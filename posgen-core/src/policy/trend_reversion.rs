//! Trend-gated mean reversion with holding-period control.
//!
//! Buys sharp dips inside uptrends and sells sharp spikes inside downtrends,
//! then exits on reversion, an RSI extreme, or after `max_holding_days`.
//!
//! Per instrument, in order (the first step that decides ends the evaluation):
//! 1. Below the minimum price → flat, entry day cleared.
//! 2. Neutral trend → position × `neutral_decay`.
//! 3. Log-return volatility above `max_volatility` → position × `high_volatility_decay`.
//! 4. Open position held for `max_holding_days` or more → flat, entry day cleared.
//! 5. Trend up: open long on a low z-score with oversold RSI; close a long on
//!    reversion or overbought RSI; otherwise hold. Trend down mirrors this.
//!
//! The decay steps leave the entry day untouched, so a decayed position still
//! counts toward its holding period.

use tracing::trace;

use crate::config::{LimitParams, TrendReversionParams};
use crate::domain::{
    clamp_position, decay_position, position_limit, to_position, Decision, InstrumentDecision,
    PriceHistory,
};
use crate::indicators::{classify_trend, log_return_stats, rsi_over_lookback, ReturnStats, Trend};
use crate::state::GeneratorState;

use super::PositionPolicy;

#[derive(Debug, Clone)]
pub struct TrendReversionPolicy {
    pub params: TrendReversionParams,
    pub limits: LimitParams,
}

impl TrendReversionPolicy {
    pub fn new(params: TrendReversionParams, limits: LimitParams) -> Self {
        Self { params, limits }
    }

    /// Return statistics for the volatility gate and z-score.
    ///
    /// With fewer than `volatility_window + 1` prices the fallback volatility is
    /// used with a zero mean.
    fn return_stats(&self, series: &[f64]) -> ReturnStats {
        log_return_stats(series, self.params.volatility_window).unwrap_or_else(|| {
            let n = series.len();
            let last = if n >= 2 {
                (series[n - 1] / series[n - 2]).ln()
            } else {
                0.0
            };
            ReturnStats {
                mean: 0.0,
                volatility: self.params.fallback_volatility,
                last,
            }
        })
    }

    /// Entry size: scales with the z-score, capped at `max_position_fraction` of the limit.
    fn entry_size(&self, z_score: f64, limit: i64) -> i64 {
        let p = &self.params;
        let fraction = (p.position_fraction * z_score.abs() / p.entry_z).min(p.max_position_fraction);
        to_position(limit as f64 * fraction)
    }

    fn evaluate_instrument(
        &self,
        instrument: usize,
        series: &[f64],
        today: usize,
        current: i64,
        entry_day: &mut Option<usize>,
    ) -> InstrumentDecision {
        let p = &self.params;
        let price = series[series.len() - 1];
        if price < self.limits.min_price {
            *entry_day = None;
            return InstrumentDecision::flat(Decision::PriceFloor);
        }

        let limit = position_limit(
            price,
            self.limits.capital_per_instrument,
            self.limits.min_price,
        );

        let trend = classify_trend(
            series,
            p.trend_short_period,
            p.trend_long_period,
            p.trend_buffer,
        );
        if trend == Trend::Neutral {
            let position = clamp_position(decay_position(current, p.neutral_decay), limit);
            return InstrumentDecision::new(position, Decision::NeutralTrendDecay);
        }

        let stats = self.return_stats(series);
        if stats.volatility > p.max_volatility {
            let position = clamp_position(decay_position(current, p.high_volatility_decay), limit);
            return InstrumentDecision::new(
                position,
                Decision::HighVolatilityDecay {
                    volatility: stats.volatility,
                },
            );
        }

        let z_score = stats.z_score();
        let rsi = rsi_over_lookback(series, p.rsi_lookback, p.rsi_period);

        if current != 0 {
            if let Some(entered) = *entry_day {
                if today.saturating_sub(entered) >= p.max_holding_days {
                    trace!(instrument, today, entered, "holding period expired");
                    *entry_day = None;
                    return InstrumentDecision::flat(Decision::HoldingPeriodExpired {
                        entry_day: entered,
                    });
                }
            }
        }

        let decision = match trend {
            Trend::Up if current == 0 && z_score < -p.entry_z && rsi < p.rsi_oversold => {
                *entry_day = Some(today);
                trace!(instrument, today, z_score, rsi, "opened long");
                InstrumentDecision::new(
                    self.entry_size(z_score, limit),
                    Decision::OpenedLong { z_score, rsi },
                )
            }
            Trend::Up if current > 0 && (z_score > p.exit_z || rsi > p.rsi_overbought) => {
                *entry_day = None;
                trace!(instrument, today, z_score, rsi, "closed long");
                InstrumentDecision::flat(Decision::Closed { z_score, rsi })
            }
            Trend::Down if current == 0 && z_score > p.entry_z && rsi > p.rsi_overbought => {
                *entry_day = Some(today);
                trace!(instrument, today, z_score, rsi, "opened short");
                InstrumentDecision::new(
                    -self.entry_size(z_score, limit),
                    Decision::OpenedShort { z_score, rsi },
                )
            }
            Trend::Down if current < 0 && (z_score < -p.exit_z || rsi < p.rsi_oversold) => {
                *entry_day = None;
                trace!(instrument, today, z_score, rsi, "closed short");
                InstrumentDecision::flat(Decision::Closed { z_score, rsi })
            }
            _ => InstrumentDecision::new(current, Decision::Held),
        };

        InstrumentDecision::new(clamp_position(decision.position, limit), decision.decision)
    }
}

impl PositionPolicy for TrendReversionPolicy {
    fn name(&self) -> &str {
        "trend_reversion"
    }

    fn min_history(&self) -> usize {
        self.params.min_history()
    }

    fn evaluate(
        &self,
        history: &PriceHistory,
        state: &mut GeneratorState,
    ) -> Vec<InstrumentDecision> {
        let today = history.today();
        state
            .positions
            .iter()
            .zip(state.entry_days.iter_mut())
            .enumerate()
            .map(|(i, (&current, entry_day))| {
                self.evaluate_instrument(i, history.series(i), today, current, entry_day)
            })
            .collect()
    }
}
