//! posgen core — daily target positions from a matrix of historical prices.
//!
//! This crate contains:
//! - Domain types (validated price history, position arithmetic, decision records)
//! - Signal library (volatility, momentum, mean reversion, breakout, trend, RSI)
//! - Volatility-adjusted sizing
//! - Two interchangeable policies behind the `PositionPolicy` trait
//! - The stateful `PositionGenerator`, called once per trading day
//! - TOML configuration, price-file loading and synthetic price series

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod generator;
pub mod indicators;
pub mod policy;
pub mod sizing;
pub mod state;
pub mod synthetic;

pub use config::{
    BlendParams, ConfigError, GeneratorConfig, LimitParams, PolicyConfig, TrendReversionParams,
};
pub use domain::{Decision, InstrumentDecision, PriceHistory, SignalRule, StepReport};
pub use error::GeneratorError;
pub use generator::PositionGenerator;
pub use policy::PositionPolicy;
pub use state::GeneratorState;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: generators can move to a worker thread, so independent
    /// simulations can run side by side.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PositionGenerator>();
        require_sync::<PositionGenerator>();
        require_send::<PriceHistory>();
        require_sync::<PriceHistory>();
        require_send::<GeneratorState>();
        require_sync::<GeneratorState>();
        require_send::<StepReport>();
        require_sync::<StepReport>();
        require_send::<GeneratorConfig>();
        require_sync::<GeneratorConfig>();
        require_send::<policy::BlendPolicy>();
        require_sync::<policy::BlendPolicy>();
        require_send::<policy::TrendReversionPolicy>();
        require_sync::<policy::TrendReversionPolicy>();
    }

    /// Architecture contract: policies see prices and their own state, nothing else.
    #[test]
    fn policy_trait_takes_history_and_state_only() {
        fn _check_trait_object_builds(
            policy: &dyn PositionPolicy,
            history: &PriceHistory,
            state: &mut GeneratorState,
        ) -> Vec<InstrumentDecision> {
            policy.evaluate(history, state)
        }
    }
}
