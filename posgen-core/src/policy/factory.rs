//! Factory — converts a `PolicyConfig` into a runtime policy object.

use crate::config::{LimitParams, PolicyConfig};

use super::{BlendPolicy, PositionPolicy, TrendReversionPolicy};

/// Create the policy selected by `config`, sharing the given limits.
pub fn create_policy(config: &PolicyConfig, limits: &LimitParams) -> Box<dyn PositionPolicy> {
    match config {
        PolicyConfig::Blend(params) => Box::new(BlendPolicy::new(params.clone(), limits.clone())),
        PolicyConfig::TrendReversion(params) => {
            Box::new(TrendReversionPolicy::new(params.clone(), limits.clone()))
        }
    }
}
