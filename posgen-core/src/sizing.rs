//! Volatility-adjusted sizing.
//!
//! Scales a base size by `target_vol / measured_vol` so quiet instruments get
//! larger positions and noisy ones smaller, with the multiplier clamped so a
//! near-zero volatility can't produce unbounded leverage.

/// Inclusive bounds on the `target / measured` volatility ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for RatioBounds {
    fn default() -> Self {
        Self { min: 0.3, max: 2.0 }
    }
}

/// `base_size * clamp(target_vol / volatility, bounds)`.
///
/// A non-positive volatility returns `base_size` unchanged.
pub fn volatility_adjusted_size(
    base_size: f64,
    volatility: f64,
    target_vol: f64,
    bounds: RatioBounds,
) -> f64 {
    if volatility <= 0.0 {
        return base_size;
    }
    let ratio = (target_vol / volatility).clamp(bounds.min, bounds.max);
    base_size * ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn scales_inversely_with_volatility() {
        let bounds = RatioBounds::default();
        assert_approx(
            volatility_adjusted_size(1.0, 0.02, 0.02, bounds),
            1.0,
            DEFAULT_EPSILON,
        );
        assert_approx(
            volatility_adjusted_size(1.0, 0.04, 0.02, bounds),
            0.5,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn clamps_low_volatility() {
        // ratio 20 -> clamped to 2.0
        assert_approx(
            volatility_adjusted_size(1.15, 0.001, 0.02, RatioBounds::default()),
            2.3,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn clamps_high_volatility() {
        // ratio 0.1 -> clamped to 0.3
        assert_approx(
            volatility_adjusted_size(1.0, 0.2, 0.02, RatioBounds::default()),
            0.3,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn degenerate_volatility_returns_base() {
        assert_eq!(
            volatility_adjusted_size(1.15, 0.0, 0.02, RatioBounds::default()),
            1.15
        );
        assert_eq!(
            volatility_adjusted_size(1.15, -0.1, 0.02, RatioBounds::default()),
            1.15
        );
    }
}
