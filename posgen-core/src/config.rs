//! Generator configuration — limits plus the selected policy and its parameters.
//!
//! Loaded from TOML. Every field has a default, so a partial file (or an empty
//! one) is valid:
//!
//! ```toml
//! num_instruments = 50
//!
//! [limits]
//! capital_per_instrument = 10000.0
//! min_price = 1.0
//!
//! [policy]
//! type = "trend_reversion"
//! max_holding_days = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sizing::RatioBounds;

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config: {0}")]
    Serialize(String),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be > 0, got {value}")))
    }
}

fn require_window(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(invalid(field, "must be >= 1"))
    } else {
        Ok(())
    }
}

fn require_unit(field: &'static str, value: f64, allow_zero: bool) -> Result<(), ConfigError> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if lower_ok && value <= 1.0 {
        Ok(())
    } else {
        let range = if allow_zero { "[0, 1]" } else { "(0, 1]" };
        Err(invalid(field, format!("must be in {range}, got {value}")))
    }
}

/// Per-instrument notional limits shared by both policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitParams {
    /// Notional budget per instrument; the position limit is `capital / price`.
    pub capital_per_instrument: f64,
    /// Instruments below this price are never traded, and prices below it are
    /// floored to it when computing limits.
    pub min_price: f64,
}

impl Default for LimitParams {
    fn default() -> Self {
        Self {
            capital_per_instrument: 10_000.0,
            min_price: 1.0,
        }
    }
}

/// Parameters of the signal-priority blend (breakout > momentum > mean reversion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendParams {
    pub momentum_days: usize,
    pub mean_revert_days: usize,
    pub volatility_days: usize,
    pub breakout_days: usize,
    pub base_position_size: f64,
    pub max_volatility: f64,
    pub target_volatility: f64,
    /// Volatility assumed when an instrument has less than `volatility_days + 1` prices.
    pub fallback_volatility: f64,
    pub vol_ratio_min: f64,
    pub vol_ratio_max: f64,
    pub momentum_threshold: f64,
    pub mean_revert_threshold: f64,
    /// Fraction beyond the trailing high/low. Kept at its historical literal of
    /// 0.00005 (0.005%), even though it was long described as "0.5%".
    pub breakout_threshold: f64,
    pub breakout_multiplier: f64,
    pub momentum_strength: f64,
    pub mean_revert_strength: f64,
    /// Mean reversion only fires while |momentum| < threshold * this ratio.
    pub weak_momentum_ratio: f64,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            momentum_days: 50,
            mean_revert_days: 5,
            volatility_days: 10,
            breakout_days: 25,
            base_position_size: 1.15,
            max_volatility: 0.225,
            target_volatility: 0.02,
            fallback_volatility: 0.05,
            vol_ratio_min: 0.3,
            vol_ratio_max: 2.0,
            momentum_threshold: 0.02,
            mean_revert_threshold: 0.035,
            breakout_threshold: 0.00005,
            breakout_multiplier: 1.2,
            momentum_strength: 1.0,
            mean_revert_strength: 0.8,
            weak_momentum_ratio: 0.5,
        }
    }
}

impl BlendParams {
    /// Days of history needed before any instrument can be evaluated.
    pub fn min_history(&self) -> usize {
        self.momentum_days
            .max(self.mean_revert_days)
            .max(self.volatility_days)
            .max(self.breakout_days)
            + 1
    }

    pub fn ratio_bounds(&self) -> RatioBounds {
        RatioBounds {
            min: self.vol_ratio_min,
            max: self.vol_ratio_max,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_window("blend.momentum_days", self.momentum_days)?;
        require_window("blend.mean_revert_days", self.mean_revert_days)?;
        require_window("blend.volatility_days", self.volatility_days)?;
        require_window("blend.breakout_days", self.breakout_days)?;
        require_positive("blend.base_position_size", self.base_position_size)?;
        require_positive("blend.max_volatility", self.max_volatility)?;
        require_positive("blend.target_volatility", self.target_volatility)?;
        require_positive("blend.fallback_volatility", self.fallback_volatility)?;
        require_positive("blend.vol_ratio_min", self.vol_ratio_min)?;
        require_positive("blend.vol_ratio_max", self.vol_ratio_max)?;
        if self.vol_ratio_max < self.vol_ratio_min {
            return Err(invalid(
                "blend.vol_ratio_max",
                format!(
                    "must be >= vol_ratio_min ({}), got {}",
                    self.vol_ratio_min, self.vol_ratio_max
                ),
            ));
        }
        if self.breakout_threshold.is_nan() || self.breakout_threshold < 0.0 {
            return Err(invalid("blend.breakout_threshold", "must be >= 0"));
        }
        require_positive("blend.momentum_threshold", self.momentum_threshold)?;
        require_positive("blend.mean_revert_threshold", self.mean_revert_threshold)?;
        require_positive("blend.breakout_multiplier", self.breakout_multiplier)?;
        require_positive("blend.momentum_strength", self.momentum_strength)?;
        require_positive("blend.mean_revert_strength", self.mean_revert_strength)?;
        require_unit("blend.weak_momentum_ratio", self.weak_momentum_ratio, false)?;
        Ok(())
    }
}

/// Parameters of trend-gated mean reversion with holding-period control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendReversionParams {
    pub trend_short_period: usize,
    pub trend_long_period: usize,
    /// Relative gap between the moving averages required to call a trend.
    pub trend_buffer: f64,
    /// Extra days beyond `trend_long_period` before the policy starts trading.
    pub warmup_padding: usize,
    pub volatility_window: usize,
    /// Volatility strictly above this decays the position instead of trading.
    pub max_volatility: f64,
    /// Volatility assumed when fewer than `volatility_window + 1` prices exist.
    pub fallback_volatility: f64,
    pub entry_z: f64,
    pub exit_z: f64,
    pub rsi_period: usize,
    pub rsi_lookback: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub max_holding_days: usize,
    pub position_fraction: f64,
    pub max_position_fraction: f64,
    pub neutral_decay: f64,
    pub high_volatility_decay: f64,
}

impl Default for TrendReversionParams {
    fn default() -> Self {
        Self {
            trend_short_period: 10,
            trend_long_period: 40,
            trend_buffer: 0.02,
            warmup_padding: 10,
            volatility_window: 20,
            max_volatility: 0.03,
            fallback_volatility: 0.02,
            entry_z: 2.0,
            exit_z: 0.0,
            rsi_period: 2,
            rsi_lookback: 10,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            max_holding_days: 10,
            position_fraction: 0.5,
            max_position_fraction: 0.8,
            neutral_decay: 0.5,
            high_volatility_decay: 0.7,
        }
    }
}

impl TrendReversionParams {
    pub fn min_history(&self) -> usize {
        self.trend_long_period + self.warmup_padding
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_window("trend_reversion.trend_short_period", self.trend_short_period)?;
        if self.trend_long_period <= self.trend_short_period {
            return Err(invalid(
                "trend_reversion.trend_long_period",
                format!(
                    "must be > trend_short_period ({}), got {}",
                    self.trend_short_period, self.trend_long_period
                ),
            ));
        }
        if self.trend_buffer.is_nan() || self.trend_buffer < 0.0 {
            return Err(invalid("trend_reversion.trend_buffer", "must be >= 0"));
        }
        require_window("trend_reversion.volatility_window", self.volatility_window)?;
        require_positive("trend_reversion.max_volatility", self.max_volatility)?;
        require_positive("trend_reversion.fallback_volatility", self.fallback_volatility)?;
        require_positive("trend_reversion.entry_z", self.entry_z)?;
        if self.exit_z.is_nan() {
            return Err(invalid("trend_reversion.exit_z", "must not be NaN"));
        }
        require_window("trend_reversion.rsi_period", self.rsi_period)?;
        if self.rsi_lookback < self.rsi_period + 1 {
            return Err(invalid(
                "trend_reversion.rsi_lookback",
                format!(
                    "must be > rsi_period ({}), got {}",
                    self.rsi_period, self.rsi_lookback
                ),
            ));
        }
        if self.rsi_oversold.is_nan()
            || self.rsi_overbought.is_nan()
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(invalid(
                "trend_reversion.rsi_oversold",
                format!(
                    "must be < rsi_overbought ({}), got {}",
                    self.rsi_overbought, self.rsi_oversold
                ),
            ));
        }
        require_window("trend_reversion.max_holding_days", self.max_holding_days)?;
        require_unit("trend_reversion.position_fraction", self.position_fraction, false)?;
        require_unit(
            "trend_reversion.max_position_fraction",
            self.max_position_fraction,
            false,
        )?;
        require_unit("trend_reversion.neutral_decay", self.neutral_decay, true)?;
        require_unit(
            "trend_reversion.high_volatility_decay",
            self.high_volatility_decay,
            true,
        )?;
        Ok(())
    }
}

/// Which policy the generator runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyConfig {
    Blend(BlendParams),
    TrendReversion(TrendReversionParams),
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::Blend(BlendParams::default())
    }
}

impl PolicyConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blend(_) => "blend",
            Self::TrendReversion(_) => "trend_reversion",
        }
    }
}

/// Complete generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Fixed size of the instrument universe.
    pub num_instruments: usize,
    pub limits: LimitParams,
    pub policy: PolicyConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_instruments: 50,
            limits: LimitParams::default(),
            policy: PolicyConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Default limits and universe with the given policy.
    pub fn with_policy(policy: PolicyConfig) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_instruments == 0 {
            return Err(invalid("num_instruments", "must be >= 1"));
        }
        require_positive(
            "limits.capital_per_instrument",
            self.limits.capital_per_instrument,
        )?;
        require_positive("limits.min_price", self.limits.min_price)?;
        match &self.policy {
            PolicyConfig::Blend(params) => params.validate(),
            PolicyConfig::TrendReversion(params) => params.validate(),
        }
    }

    /// Hex blake3 digest of the canonical JSON form.
    ///
    /// Two configs with identical parameters share a fingerprint, so runs can be
    /// matched up in logs.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_vec(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(blake3::hash(&json).to_hex().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GeneratorConfig::default().validate().unwrap();
        GeneratorConfig::with_policy(PolicyConfig::TrendReversion(Default::default()))
            .validate()
            .unwrap();
    }

    #[test]
    fn blend_min_history_is_longest_window_plus_one() {
        assert_eq!(BlendParams::default().min_history(), 51);
    }

    #[test]
    fn trend_reversion_min_history_is_long_period_plus_padding() {
        assert_eq!(TrendReversionParams::default().min_history(), 50);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn partial_policy_table() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            num_instruments = 2

            [policy]
            type = "trend_reversion"
            max_holding_days = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.num_instruments, 2);
        let PolicyConfig::TrendReversion(params) = &config.policy else {
            panic!("expected trend_reversion, got {:?}", config.policy);
        };
        assert_eq!(params.max_holding_days, 5);
        assert_eq!(params.trend_long_period, 40);
        assert_eq!(config.policy.name(), "trend_reversion");
    }

    #[test]
    fn toml_roundtrip() {
        let config = GeneratorConfig::with_policy(PolicyConfig::TrendReversion(
            TrendReversionParams {
                entry_z: 1.75,
                ..Default::default()
            },
        ));
        let text = config.to_toml_string().unwrap();
        assert!(text.contains(r#"type = "trend_reversion""#));
        assert_eq!(GeneratorConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn breakout_threshold_keeps_literal_value() {
        // Documented elsewhere as "0.5%"; the literal in use is 0.005%.
        let params = BlendParams::default();
        assert_eq!(params.breakout_threshold, 0.00005);
        assert_ne!(params.breakout_threshold, 0.005);
    }

    #[test]
    fn unknown_policy_type_is_rejected() {
        let err = GeneratorConfig::from_toml_str("[policy]\ntype = \"martingale\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_inverted_moving_averages() {
        let config = GeneratorConfig::with_policy(PolicyConfig::TrendReversion(
            TrendReversionParams {
                trend_short_period: 40,
                trend_long_period: 10,
                ..Default::default()
            },
        ));
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "trend_reversion.trend_long_period",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_limits_and_windows() {
        let mut config = GeneratorConfig::default();
        config.limits.min_price = 0.0;
        assert!(config.validate().is_err());

        let config = GeneratorConfig::with_policy(PolicyConfig::Blend(BlendParams {
            breakout_days: 0,
            ..Default::default()
        }));
        assert!(config.validate().is_err());

        let config = GeneratorConfig::with_policy(PolicyConfig::Blend(BlendParams {
            vol_ratio_min: 2.0,
            vol_ratio_max: 0.3,
            ..Default::default()
        }));
        assert!(config.validate().is_err());

        let config = GeneratorConfig {
            num_instruments: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_ratio_bound() {
        let err = GeneratorConfig::from_toml_str(
            "num_instruments = 1\n[policy]\ntype = \"blend\"\nvol_ratio_max = nan\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "blend.vol_ratio_max",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_positive_signal_strengths() {
        for params in [
            BlendParams {
                breakout_multiplier: -1.2,
                ..Default::default()
            },
            BlendParams {
                momentum_strength: f64::NAN,
                ..Default::default()
            },
            BlendParams {
                mean_revert_strength: 0.0,
                ..Default::default()
            },
        ] {
            assert!(params.validate().is_err(), "{params:?}");
        }
    }

    #[test]
    fn rejects_out_of_range_fractions() {
        let config = GeneratorConfig::with_policy(PolicyConfig::TrendReversion(
            TrendReversionParams {
                max_position_fraction: 1.5,
                ..Default::default()
            },
        ));
        assert!(config.validate().is_err());

        let config = GeneratorConfig::with_policy(PolicyConfig::TrendReversion(
            TrendReversionParams {
                neutral_decay: -0.1,
                ..Default::default()
            },
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn fingerprint_tracks_parameters() {
        let a = GeneratorConfig::default();
        let b = GeneratorConfig::default();
        let c = GeneratorConfig::with_policy(PolicyConfig::Blend(BlendParams {
            momentum_days: 40,
            ..Default::default()
        }));
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = GeneratorConfig::load(Path::new("/nonexistent/posgen.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
