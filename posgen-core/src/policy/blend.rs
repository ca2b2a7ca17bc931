//! Signal-priority blend: breakout, then momentum, then mean reversion.
//!
//! Per instrument:
//! 1. Below the minimum price → flat.
//! 2. Simple-return volatility above the ceiling → flat.
//! 3. Size = base size scaled by target/measured volatility (clamped).
//! 4. Signal strength from the priority rules (see `rules`).
//! 5. Position = trunc(size × limit × strength), clamped to ±limit.
//!
//! Instruments are independent, so they are evaluated in parallel.

use rayon::prelude::*;

use crate::config::{BlendParams, LimitParams};
use crate::domain::{
    clamp_position, position_limit, to_position, Decision, InstrumentDecision, PriceHistory,
};
use crate::indicators::{breakout_signal, mean_reversion_signal, momentum, simple_return_volatility};
use crate::sizing::volatility_adjusted_size;
use crate::state::GeneratorState;

use super::rules::{resolve_signal, SignalInputs};
use super::PositionPolicy;

#[derive(Debug, Clone)]
pub struct BlendPolicy {
    pub params: BlendParams,
    pub limits: LimitParams,
}

impl BlendPolicy {
    pub fn new(params: BlendParams, limits: LimitParams) -> Self {
        Self { params, limits }
    }

    /// Signals for one series, before rule resolution.
    pub fn signal_inputs(&self, series: &[f64]) -> SignalInputs {
        let p = &self.params;
        SignalInputs {
            momentum: momentum(series, p.momentum_days),
            mean_reversion: mean_reversion_signal(series, p.mean_revert_days),
            breakout: breakout_signal(series, p.breakout_days, p.breakout_threshold),
        }
    }

    pub(crate) fn evaluate_instrument(&self, series: &[f64]) -> InstrumentDecision {
        let p = &self.params;
        let Some(&price) = series.last() else {
            return InstrumentDecision::flat(Decision::Warmup);
        };
        if price < self.limits.min_price {
            return InstrumentDecision::flat(Decision::PriceFloor);
        }

        let volatility = simple_return_volatility(series, p.volatility_days, p.fallback_volatility);
        if volatility > p.max_volatility {
            return InstrumentDecision::flat(Decision::VolatilityCeiling { volatility });
        }

        let size = volatility_adjusted_size(
            p.base_position_size,
            volatility,
            p.target_volatility,
            p.ratio_bounds(),
        );
        let limit = position_limit(
            price,
            self.limits.capital_per_instrument,
            self.limits.min_price,
        );

        match resolve_signal(&self.signal_inputs(series), p) {
            Some((rule, strength)) => {
                let position = clamp_position(to_position(size * limit as f64 * strength), limit);
                InstrumentDecision::new(position, Decision::Signal { rule, strength })
            }
            None => InstrumentDecision::flat(Decision::NoSignal),
        }
    }
}

impl PositionPolicy for BlendPolicy {
    fn name(&self) -> &str {
        "blend"
    }

    fn min_history(&self) -> usize {
        self.params.min_history()
    }

    fn evaluate(
        &self,
        history: &PriceHistory,
        _state: &mut GeneratorState,
    ) -> Vec<InstrumentDecision> {
        (0..history.num_instruments())
            .into_par_iter()
            .map(|i| self.evaluate_instrument(history.series(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SignalRule;

    fn policy() -> BlendPolicy {
        BlendPolicy::new(BlendParams::default(), LimitParams::default())
    }

    /// 60 flat days at `base` followed by `tail`.
    fn flat_then(base: f64, tail: &[f64]) -> Vec<f64> {
        let mut prices = vec![base; 60];
        prices.extend_from_slice(tail);
        prices
    }

    #[test]
    fn empty_series_is_flat() {
        assert_eq!(
            policy().evaluate_instrument(&[]),
            InstrumentDecision::flat(Decision::Warmup)
        );
    }

    #[test]
    fn price_floor_rejects() {
        let series = vec![0.5; 60];
        let decision = policy().evaluate_instrument(&series);
        assert_eq!(decision, InstrumentDecision::flat(Decision::PriceFloor));
    }

    #[test]
    fn volatility_ceiling_rejects() {
        // Alternating +100% / -50% swings: volatility far above 0.225.
        let series: Vec<f64> = (0..60).map(|i| if i % 2 == 0 { 10.0 } else { 20.0 }).collect();
        let decision = policy().evaluate_instrument(&series);
        assert_eq!(decision.position, 0);
        assert!(matches!(
            decision.decision,
            Decision::VolatilityCeiling { volatility } if volatility > 0.225
        ));
    }

    #[test]
    fn flat_series_has_no_signal() {
        let decision = policy().evaluate_instrument(&vec![100.0; 60]);
        assert_eq!(decision, InstrumentDecision::flat(Decision::NoSignal));
    }

    #[test]
    fn breakout_long_is_clamped_to_limit() {
        // Jump of 1% on the last day: breakout up. Volatility of the last 10
        // returns is tiny, so the size multiplier clamps at 2.0 × 1.15 × 1.2,
        // far beyond the limit of trunc(10000 / 101) = 99.
        let series = flat_then(100.0, &[101.0]);
        let decision = policy().evaluate_instrument(&series);
        assert_eq!(decision.position, 99);
        assert!(matches!(
            decision.decision,
            Decision::Signal {
                rule: SignalRule::Breakout,
                ..
            }
        ));
    }

    #[test]
    fn breakout_short_is_clamped_to_limit() {
        let series = flat_then(100.0, &[99.0]);
        let decision = policy().evaluate_instrument(&series);
        // trunc(10000 / 99) = 101
        assert_eq!(decision.position, -101);
    }

    #[test]
    fn breakout_threshold_is_the_literal_not_half_a_percent() {
        // The literal 0.00005 is 0.005%, not the 0.5% it is often described as:
        // a 0.01% poke above the trailing high already counts as a breakout.
        assert_eq!(BlendParams::default().breakout_threshold, 0.00005);
        let series = flat_then(100.0, &[100.01]);
        assert_eq!(policy().signal_inputs(&series).breakout, 1);
        assert_eq!(policy().evaluate_instrument(&series).position, 99);
    }

    #[test]
    fn mean_reversion_sizes_by_volatility() {
        // Today's 99.6 is ~4.2% under the 104 plateau but above the dip to 95
        // inside the breakout window. Momentum over 50 days is -0.4%.
        let mut series = vec![100.0; 45];
        series.push(95.0);
        series.extend([100.0; 4]);
        series.extend([104.0; 5]);
        series.push(99.6);
        let p = policy();
        let inputs = p.signal_inputs(&series);
        assert!(inputs.momentum.abs() < 0.01, "momentum {}", inputs.momentum);
        assert!(inputs.mean_reversion < -0.035);
        assert_eq!(inputs.breakout, 0);

        let decision = p.evaluate_instrument(&series);
        assert!(matches!(
            decision.decision,
            Decision::Signal {
                rule: SignalRule::MeanReversionLong,
                ..
            }
        ));

        let volatility = simple_return_volatility(&series, 10, 0.05);
        let size = volatility_adjusted_size(1.15, volatility, 0.02, Default::default());
        let limit = position_limit(99.6, 10_000.0, 1.0);
        let expected = clamp_position(to_position(size * limit as f64 * 0.8), limit);
        assert_eq!(decision.position, expected);
        assert!(decision.position > 0 && decision.position <= limit);
    }

    #[test]
    fn evaluate_covers_every_instrument_in_order() {
        let history = PriceHistory::new(vec![
            flat_then(100.0, &[101.0]),
            vec![0.5; 61],
            flat_then(100.0, &[99.0]),
        ])
        .unwrap();
        let mut state = GeneratorState::new(3);
        let decisions = policy().evaluate(&history, &mut state);
        let positions: Vec<i64> = decisions.iter().map(|d| d.position).collect();
        assert_eq!(positions, vec![99, 0, -101]);
    }

    #[test]
    fn name_and_min_history() {
        assert_eq!(policy().name(), "blend");
        assert_eq!(policy().min_history(), 51);
    }
}
