//! Priority rules of the blend policy.
//!
//! An ordered list of (predicate, strength) pairs evaluated top to bottom; the
//! first rule whose predicate holds decides the signal. No match means flat.
//!
//! | order | rule                 | fires when                                        | strength            |
//! |-------|----------------------|---------------------------------------------------|---------------------|
//! | 1     | breakout             | breakout != 0                                     | breakout × 1.2      |
//! | 2     | momentum long        | momentum > threshold                              | +1.0                |
//! | 3     | momentum short       | momentum < -threshold                             | -1.0                |
//! | 4     | mean reversion long  | weak momentum and deviation < -mr threshold       | +0.8                |
//! | 5     | mean reversion short | weak momentum and deviation > mr threshold        | -0.8                |
//!
//! "Weak" momentum is |momentum| < threshold × 0.5, so momentum between half and
//! the full threshold produces no signal at all.

use crate::config::BlendParams;
use crate::domain::SignalRule;

/// Signals computed for one instrument before rule resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalInputs {
    pub momentum: f64,
    pub mean_reversion: f64,
    pub breakout: i8,
}

/// One entry of the priority list.
#[derive(Clone, Copy)]
pub struct Rule {
    pub rule: SignalRule,
    pub applies: fn(&SignalInputs, &BlendParams) -> bool,
    pub strength: fn(&SignalInputs, &BlendParams) -> f64,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("rule", &self.rule).finish()
    }
}

fn breakout_fired(s: &SignalInputs, _: &BlendParams) -> bool {
    s.breakout != 0
}

fn breakout_strength(s: &SignalInputs, p: &BlendParams) -> f64 {
    f64::from(s.breakout) * p.breakout_multiplier
}

fn strong_up(s: &SignalInputs, p: &BlendParams) -> bool {
    s.momentum > p.momentum_threshold
}

fn strong_down(s: &SignalInputs, p: &BlendParams) -> bool {
    s.momentum < -p.momentum_threshold
}

fn momentum_long(_: &SignalInputs, p: &BlendParams) -> f64 {
    p.momentum_strength
}

fn momentum_short(_: &SignalInputs, p: &BlendParams) -> f64 {
    -p.momentum_strength
}

fn weak_momentum(s: &SignalInputs, p: &BlendParams) -> bool {
    s.momentum.abs() < p.momentum_threshold * p.weak_momentum_ratio
}

fn stretched_below(s: &SignalInputs, p: &BlendParams) -> bool {
    weak_momentum(s, p) && s.mean_reversion < -p.mean_revert_threshold
}

fn stretched_above(s: &SignalInputs, p: &BlendParams) -> bool {
    weak_momentum(s, p) && s.mean_reversion > p.mean_revert_threshold
}

fn reversion_long(_: &SignalInputs, p: &BlendParams) -> f64 {
    p.mean_revert_strength
}

fn reversion_short(_: &SignalInputs, p: &BlendParams) -> f64 {
    -p.mean_revert_strength
}

/// Rules in priority order.
pub const PRIORITY: [Rule; 5] = [
    Rule {
        rule: SignalRule::Breakout,
        applies: breakout_fired,
        strength: breakout_strength,
    },
    Rule {
        rule: SignalRule::MomentumLong,
        applies: strong_up,
        strength: momentum_long,
    },
    Rule {
        rule: SignalRule::MomentumShort,
        applies: strong_down,
        strength: momentum_short,
    },
    Rule {
        rule: SignalRule::MeanReversionLong,
        applies: stretched_below,
        strength: reversion_long,
    },
    Rule {
        rule: SignalRule::MeanReversionShort,
        applies: stretched_above,
        strength: reversion_short,
    },
];

/// First matching rule and its signed strength, or `None` for flat.
pub fn resolve_signal(inputs: &SignalInputs, params: &BlendParams) -> Option<(SignalRule, f64)> {
    PRIORITY
        .iter()
        .find(|r| (r.applies)(inputs, params))
        .map(|r| (r.rule, (r.strength)(inputs, params)))
}
