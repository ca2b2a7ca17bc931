//! Position limits and integer position arithmetic.
//!
//! Positions are signed share counts. Every conversion from a fractional size
//! truncates toward zero, so a long and a short of the same strength always have
//! the same magnitude.

/// Maximum absolute position for an instrument at `price`.
///
/// `trunc(capital / max(price, min_price))`, which keeps notional exposure per
/// instrument roughly constant and stops tiny prices from producing huge limits.
pub fn position_limit(price: f64, capital_per_instrument: f64, min_price: f64) -> i64 {
    (capital_per_instrument / price.max(min_price)) as i64
}

/// Convert a fractional share count into a position, truncating toward zero.
pub fn to_position(size: f64) -> i64 {
    if size.is_finite() {
        size as i64
    } else {
        0
    }
}

/// Clamp a position into `[-limit, limit]`.
pub fn clamp_position(position: i64, limit: i64) -> i64 {
    let limit = limit.max(0);
    position.clamp(-limit, limit)
}

/// Shrink an existing position by `factor`, truncating toward zero.
pub fn decay_position(position: i64, factor: f64) -> i64 {
    to_position(position as f64 * factor)
}
